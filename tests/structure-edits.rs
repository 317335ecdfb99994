//! Tests for structural edits keeping the trees consistent.

use synforest::{ChildPos, DftEvent, Forest, NodeId, StructureError, TreeBuilder};

use pretty_assertions::assert_eq;

/// Returns the DFT events of the tree as labels.
fn events(forest: &Forest<&'static str>, root: NodeId) -> Vec<DftEvent<&'static str>> {
    forest
        .node(root)
        .expect("root must be alive")
        .depth_first_traverse()
        .map(|ev| ev.map(|node| *node.label()))
        .collect()
}

/// Asserts that parents, orders, and lengths in the tree are consistent.
fn assert_consistent(forest: &Forest<&'static str>, root: NodeId) {
    let root = forest.node(root).expect("root must be alive");
    for node in root.preorder() {
        for (i, child) in node.children().enumerate() {
            assert_eq!(child.parent_id(), Some(node.id()), "parent of {:?}", child);
            assert_eq!(child.order(), i, "order of {:?}", child);
        }
        let expected = if node.is_leaf() {
            1
        } else {
            node.children().map(|child| child.length()).sum()
        };
        assert_eq!(node.length(), expected, "length of {:?}", node);
    }
}

/// Move the first child after the last child.
#[test]
fn move_sibling_to_end() {
    let mut forest = Forest::new();
    let root = TreeBuilder::new(&mut forest, "root")
        .child("0")
        .sibling("1")
        .sibling("2")
        .root_id();
    //  root
    //  |-- 0
    //  |-- 1
    //  `-- 2

    let child0 = forest
        .delete_child(root, 0)
        .expect("should succeed");
    forest
        .append_child(root, child0)
        .expect("should succeed");
    //  root
    //  |-- 1
    //  |-- 2
    //  `-- 0

    let expected = &[
        DftEvent::Open("root"),
        DftEvent::Open("1"),
        DftEvent::Close("1"),
        DftEvent::Open("2"),
        DftEvent::Close("2"),
        DftEvent::Open("0"),
        DftEvent::Close("0"),
        DftEvent::Close("root"),
    ];
    assert_eq!(events(&forest, root), expected);
    assert_consistent(&forest, root);
}

/// Make a node a child of its descendant.
#[test]
fn ancestor_under_descendant() {
    let mut forest = Forest::new();
    let mut builder = TreeBuilder::new(&mut forest, "root");
    builder.child("0").child("0-0").child("0-0-0");
    let deepest = builder.current_id();
    let root = builder.root_id();
    //  root
    //  `-- 0
    //      `-- 0-0
    //          `-- 0-0-0

    let child0 = forest.delete_child(root, ChildPos::Last).expect("should succeed");
    let before = events(&forest, child0);
    assert_eq!(
        forest.insert_child(deepest, 0, child0),
        Err(StructureError::AncestorDescendantLoop)
    );
    assert_eq!(
        forest.insert_child(child0, 0, child0),
        Err(StructureError::AncestorDescendantLoop)
    );
    assert_eq!(events(&forest, child0), before, "the tree must be untouched");
    assert_consistent(&forest, child0);
}

/// Attach a node that already has a parent.
#[test]
fn attached_node_elsewhere() {
    let mut forest = Forest::new();
    let mut builder = TreeBuilder::new(&mut forest, "root");
    builder.child("0").sibling("1");
    let child1 = builder.current_id();
    let root = builder.root_id();
    let other = forest.create_root("other");

    assert_eq!(
        forest.append_child(other, child1),
        Err(StructureError::AlreadyAttached)
    );
    assert_eq!(
        forest.create_node("new", [child1]),
        Err(StructureError::AlreadyAttached)
    );
    let leaf = forest.create_root("leaf");
    assert_eq!(
        forest.create_node("new", [leaf, leaf]),
        Err(StructureError::AlreadyAttached)
    );
    assert_eq!(
        forest.insert_child(root, 3, leaf),
        Err(StructureError::IndexOutOfRange { index: 3, len: 2 })
    );
    assert!(forest.node(leaf).map_or(false, |n| n.is_root()));
    assert_consistent(&forest, root);
}

#[test]
fn detach_root() {
    let mut forest = Forest::new();
    let root = forest.create_root("root");
    assert_eq!(forest.detach(root), Err(StructureError::NoParent));
    assert_eq!(
        forest.delete_child(root, 0),
        Err(StructureError::IndexOutOfRange { index: 0, len: 0 })
    );
}

/// Emptying nodes one by one.
#[test]
fn delete_only_child_then_clean() {
    let mut forest = Forest::new();
    let mut builder = TreeBuilder::new(&mut forest, "S");
    builder
        .child("A")
        .child("B")
        .child("x")
        .parent()
        .sibling("C")
        .child("y");
    let y = builder.current_id();
    let root = builder.root_id();
    builder.child("z");
    //  S
    //  `-- A
    //      |-- B
    //      |   `-- x
    //      `-- C
    //          `-- y
    //              `-- z
    let (a, b) = {
        let root = forest.node(root).expect("root must be alive");
        let b = root.at(&[0, 0]).expect("address must be valid");
        (b.parent_id().expect("B has a parent"), b.id())
    };
    assert_eq!(forest.node(root).map(|n| n.length()), Some(2));

    // Deleting the only child makes `B` an empty leaf.
    let x = forest.delete_child(b, 0).expect("should succeed");
    assert!(forest.is_alive(x));
    let b_node = forest.node(b).expect("B must be alive");
    assert!(b_node.is_leaf());
    assert_eq!(b_node.length(), 1);
    assert_consistent(&forest, root);

    // Removing the chain under `C` prunes `C` but keeps `A`, which has `B`.
    let z = forest
        .node(y)
        .and_then(|n| n.child(0))
        .map(|n| n.id())
        .expect("z exists");
    forest.delete_clean(z).expect("should succeed");
    assert!(!forest.is_alive(y));
    assert!(forest.is_alive(a));
    assert_eq!(
        events(&forest, root),
        [
            DftEvent::Open("S"),
            DftEvent::Open("A"),
            DftEvent::Open("B"),
            DftEvent::Close("B"),
            DftEvent::Close("A"),
            DftEvent::Close("S"),
        ]
    );

    // Deleting the last leaf prunes up to the root.
    forest.delete_clean(b).expect("should succeed");
    assert!(!forest.is_alive(a));
    assert_eq!(events(&forest, root), [DftEvent::Open("S"), DftEvent::Close("S")]);
    assert_consistent(&forest, root);
}

#[test]
fn insert_into_leaf_takes_child_length() {
    let mut forest = Forest::<String>::new();
    let root = forest.parse("(S (NP dog) (VP barked))").expect("should succeed");
    let np = forest
        .node(root)
        .and_then(|n| n.child(0))
        .map(|n| n.id())
        .expect("NP exists");
    let dog = forest
        .node(np)
        .and_then(|n| n.child(0))
        .map(|n| n.id())
        .expect("dog exists");
    let det = forest.parse("(DT (X the) (Y a))").expect("should succeed");

    forest.insert_child(dog, 0, det).expect("should succeed");

    let root_node = forest.node(root).expect("root must be alive");
    assert_eq!(root_node.to_string(), "(S (NP (dog (DT (X the) (Y a)))) (VP barked))");
    assert_eq!(root_node.length(), 3);
    assert_eq!(forest.node(np).map(|n| n.length()), Some(2));
}
