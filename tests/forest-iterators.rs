//! Tests for iterators of forest.

use synforest::{DftEvent, Forest, NodeId, TreeBuilder};

use pretty_assertions::assert_eq;

/// Returns the sample tree as a forest and the root node ID.
///
/// Tree to be built:
///
/// ```text
/// root
/// |-- 0
/// |   |-- 0-0
/// |   |-- 0-1
/// |   |   |-- 0-1-0
/// |   |   |-- 0-1-1
/// |   |   `-- 0-1-2
/// |   `-- 0-2
/// |-- 1
/// |-- 2
/// |   |-- 2-0
/// |   |-- 2-1
/// |   `-- 2-2
/// |       `-- 2-2-0
/// `-- 3
/// ```
fn sample_tree() -> (Forest<&'static str>, NodeId) {
    let mut forest = Forest::new();
    let root = TreeBuilder::new(&mut forest, "root")
        .child("0")
        .child("0-0")
        .sibling("0-1")
        .child("0-1-0")
        .sibling("0-1-1")
        .sibling("0-1-2")
        .parent()
        .sibling("0-2")
        .parent()
        .sibling("1")
        .sibling("2")
        .child("2-0")
        .sibling("2-1")
        .sibling("2-2")
        .child("2-2-0")
        .parent()
        .parent()
        .sibling("3")
        .root_id();
    (forest, root)
}

const SAMPLE_TREE_DFT_EVENTS: &[DftEvent<&str>] = &[
    DftEvent::Open("root"),
    DftEvent::Open("0"),
    DftEvent::Open("0-0"),
    DftEvent::Close("0-0"),
    DftEvent::Open("0-1"),
    DftEvent::Open("0-1-0"),
    DftEvent::Close("0-1-0"),
    DftEvent::Open("0-1-1"),
    DftEvent::Close("0-1-1"),
    DftEvent::Open("0-1-2"),
    DftEvent::Close("0-1-2"),
    DftEvent::Close("0-1"),
    DftEvent::Open("0-2"),
    DftEvent::Close("0-2"),
    DftEvent::Close("0"),
    DftEvent::Open("1"),
    DftEvent::Close("1"),
    DftEvent::Open("2"),
    DftEvent::Open("2-0"),
    DftEvent::Close("2-0"),
    DftEvent::Open("2-1"),
    DftEvent::Close("2-1"),
    DftEvent::Open("2-2"),
    DftEvent::Open("2-2-0"),
    DftEvent::Close("2-2-0"),
    DftEvent::Close("2-2"),
    DftEvent::Close("2"),
    DftEvent::Open("3"),
    DftEvent::Close("3"),
    DftEvent::Close("root"),
];

/// Returns the labels of the nodes.
fn labels<'a>(nodes: impl Iterator<Item = synforest::Node<'a, &'static str>>) -> Vec<&'static str> {
    nodes.map(|node| *node.label()).collect()
}

#[test]
fn dft_forward() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");

    let actual = root
        .depth_first_traverse()
        .map(|ev| ev.map(|node| *node.label()))
        .collect::<Vec<_>>();

    assert_eq!(actual, SAMPLE_TREE_DFT_EVENTS);
}

#[test]
fn dft_backward() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");

    // Collect items by reverse iteration.
    let mut actual = root
        .depth_first_traverse()
        .rev()
        .map(|ev| ev.map(|node| *node.label()))
        .collect::<Vec<_>>();
    // Reverse the result.
    actual.reverse();

    assert_eq!(actual, SAMPLE_TREE_DFT_EVENTS);
}

#[test]
fn dft_from_both_ends() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");

    let mut iter = root.depth_first_traverse();
    let mut front = Vec::new();
    let mut back = Vec::new();
    loop {
        match iter.next() {
            Some(ev) => front.push(ev.map(|node| *node.label())),
            None => break,
        }
        match iter.next_back() {
            Some(ev) => back.push(ev.map(|node| *node.label())),
            None => break,
        }
    }
    back.reverse();
    front.extend(back);

    assert_eq!(front, SAMPLE_TREE_DFT_EVENTS);
}

#[test]
fn dft_of_subtree() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");
    let subtree = root.at(&[2]).expect("address must be valid");

    let actual = subtree
        .depth_first_traverse()
        .map(|ev| ev.map(|node| *node.label()))
        .collect::<Vec<_>>();

    assert_eq!(actual, &SAMPLE_TREE_DFT_EVENTS[17..27]);
}

#[test]
fn preorder_and_postorder() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");

    let expected_pre = SAMPLE_TREE_DFT_EVENTS
        .iter()
        .filter_map(|ev| match *ev {
            DftEvent::Open(label) => Some(label),
            DftEvent::Close(_) => None,
        })
        .collect::<Vec<_>>();
    let expected_post = SAMPLE_TREE_DFT_EVENTS
        .iter()
        .filter_map(|ev| match *ev {
            DftEvent::Open(_) => None,
            DftEvent::Close(label) => Some(label),
        })
        .collect::<Vec<_>>();

    assert_eq!(labels(root.preorder()), expected_pre);
    assert_eq!(labels(root.postorder()), expected_post);

    let mut reversed = labels(root.preorder().rev());
    reversed.reverse();
    assert_eq!(reversed, expected_pre);
}

#[test]
fn frontier() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");

    let leaves = [
        "0-0", "0-1-0", "0-1-1", "0-1-2", "0-2", "1", "2-0", "2-1", "2-2-0", "3",
    ];
    assert_eq!(labels(root.frontier()), leaves);
    assert_eq!(root.yield_labels(), leaves.iter().collect::<Vec<_>>());
    assert_eq!(root.length(), leaves.len());

    let mut reversed = labels(root.frontier().rev());
    reversed.reverse();
    assert_eq!(reversed, leaves);

    let one = root.at(&[1]).expect("address must be valid");
    assert_eq!(labels(one.frontier()), ["1"]);
}

#[test]
fn ancestors_and_children() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");
    let node = root.at(&[2, 2, 0]).expect("address must be valid");

    assert_eq!(labels(node.ancestors()), ["2-2-0", "2-2", "2", "root"]);
    assert_eq!(labels(root.ancestors()), ["root"]);

    let children = root.children();
    assert_eq!(children.len(), 4);
    assert_eq!(labels(children.clone()), ["0", "1", "2", "3"]);
    assert_eq!(labels(children.rev()), ["3", "2", "1", "0"]);
}

#[test]
fn lengths_and_orders() {
    let (forest, root) = sample_tree();
    let root = forest.node(root).expect("root must be alive");

    let lengths = root
        .children()
        .map(|node| (*node.label(), node.order(), node.length()))
        .collect::<Vec<_>>();
    assert_eq!(
        lengths,
        [("0", 0, 5), ("1", 1, 1), ("2", 2, 3), ("3", 3, 1)]
    );
}
