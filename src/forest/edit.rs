//! Filtering and copying of trees.

use tracing::trace;

use crate::forest::traverse::DftEvent;
use crate::forest::{Forest, Node};
use crate::id::NodeId;

/// A step to build a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Planned<U> {
    /// Start a node with the label.
    Open(U),
    /// Finish the innermost unfinished node.
    Close,
}

/// Plans the construction of a copy of the subtree.
///
/// The root is always kept. Other nodes are kept if `keep` returns true, and
/// the subtree of a rejected node is skipped without calling `keep`.
fn plan<'a, T, K, L, U>(root: Node<'a, T>, mut keep: K, mut label: L) -> Vec<Planned<U>>
where
    K: FnMut(&Node<'a, T>) -> bool,
    L: FnMut(&Node<'a, T>) -> U,
{
    let mut planned = Vec::new();
    let mut events = root.depth_first_traverse();
    while let Some(ev) = events.next() {
        match ev {
            DftEvent::Open(node) => {
                if node != root && !keep(&node) {
                    for ev in &mut events {
                        if ev == DftEvent::Close(node) {
                            break;
                        }
                    }
                    continue;
                }
                planned.push(Planned::Open(label(&node)));
            }
            DftEvent::Close(_) => planned.push(Planned::Close),
        }
    }

    planned
}

impl<T> Forest<T> {
    /// Creates the planned tree and returns its root.
    fn build_planned(&mut self, planned: Vec<Planned<T>>) -> NodeId {
        let mut stack: Vec<(T, Vec<NodeId>)> = Vec::new();
        for step in planned {
            match step {
                Planned::Open(label) => stack.push((label, Vec::new())),
                Planned::Close => {
                    let (label, children) = stack
                        .pop()
                        .expect("[consistency] open and close steps are balanced");
                    let id = self
                        .create_node(label, children)
                        .expect("[consistency] planned children are fresh roots");
                    match stack.last_mut() {
                        Some((_, siblings)) => siblings.push(id),
                        None => return id,
                    }
                }
            }
        }

        unreachable!("[consistency] a plan always contains the root")
    }

    /// Creates a copy of the tree with new labels, and returns its root.
    ///
    /// The copy has the same shape as the tree under `root`, and each of its
    /// labels is `f(source_node)`.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(NP (DT the) (NN dog))")?;
    ///
    /// let depths = forest.relabel(root, |node| {
    ///     format!("{}@{}", node.label(), node.ancestors().count() - 1)
    /// });
    ///
    /// let depths = forest.node(depths).expect("should never fail: node exists");
    /// assert_eq!(depths.to_string(), "(NP@0 (DT@1 the@2) (NN@1 dog@2))");
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    pub fn relabel<F>(&mut self, root: NodeId, f: F) -> NodeId
    where
        F: FnMut(&Node<'_, T>) -> T,
    {
        let root = self
            .node(root)
            .expect("[precondition] the root must be alive");
        let planned = plan(root, |_| true, f);
        self.build_planned(planned)
    }

    /// Removes the nodes in the subtree which do not satisfy the predicate,
    /// together with their descendants.
    ///
    /// The predicate is tested from the top down, and never on `root` or on
    /// the nodes under a rejected node. A node whose children are all
    /// rejected becomes a leaf. Lengths of `root` and of its ancestors are
    /// updated.
    ///
    /// Returns the number of removed nodes.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not alive.
    pub fn filter_inplace<F>(&mut self, root: NodeId, mut pred: F) -> usize
    where
        F: FnMut(&Node<'_, T>) -> bool,
    {
        let rejected = self
            .node(root)
            .expect("[precondition] the root must be alive")
            .find_descendants(|node| !pred(node))
            .iter()
            .map(Node::id)
            .collect::<Vec<_>>();

        rejected
            .into_iter()
            .map(|id| {
                trace!(node = ?id, "pruning rejected subtree");
                self.remove_subtree(id)
            })
            .sum()
    }
}

impl<T: Clone> Forest<T> {
    /// Creates a copy of the tree keeping only the nodes which satisfy the
    /// predicate, and returns its root.
    ///
    /// The root is kept unconditionally. A rejected node is dropped with its
    /// whole subtree, and the predicate is not called on the nodes under it.
    /// The source tree is not modified.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(S (NP (NN dog)) (PUNCT ,) (VP (VBD barked)) (PUNCT .))")?;
    ///
    /// let filtered = forest.filter(root, |node| node.label() != "PUNCT");
    ///
    /// let filtered = forest.node(filtered).expect("should never fail: node exists");
    /// assert_eq!(filtered.to_string(), "(S (NP (NN dog)) (VP (VBD barked)))");
    /// assert_eq!(filtered.length(), 2);
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    pub fn filter<F>(&mut self, root: NodeId, pred: F) -> NodeId
    where
        F: FnMut(&Node<'_, T>) -> bool,
    {
        let root = self
            .node(root)
            .expect("[precondition] the root must be alive");
        let planned = plan(root, pred, |node| node.label().clone());
        self.build_planned(planned)
    }

    /// Creates a copy of the tree, and returns its root.
    ///
    /// # Panics
    ///
    /// Panics if `root` is not alive.
    pub fn clone_subtree(&mut self, root: NodeId) -> NodeId {
        self.relabel(root, |node| node.label().clone())
    }
}

impl<'a, T> Node<'a, T> {
    /// Creates a copy of the subtree in another forest with new labels, and
    /// returns its root.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut words = Forest::<String>::new();
    /// let root = words.parse("(NP (DT the) (NN dog))")?;
    /// let root = words.node(root).expect("should never fail: node exists");
    ///
    /// let mut lengths = Forest::new();
    /// let copy = root.relabel_into(&mut lengths, |node| node.label().len());
    ///
    /// let copy = lengths.node(copy).expect("should never fail: node exists");
    /// assert_eq!(copy.to_string(), "(2 (2 3) (2 3))");
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    pub fn relabel_into<U, F>(&self, dest: &mut Forest<U>, f: F) -> NodeId
    where
        F: FnMut(&Node<'a, T>) -> U,
    {
        dest.build_planned(plan(*self, |_| true, f))
    }
}

impl<'a, T: Clone> Node<'a, T> {
    /// Creates a copy of the subtree in another forest, keeping only the
    /// nodes which satisfy the predicate, and returns its root.
    ///
    /// See [`Forest::filter`] for the semantics of the predicate.
    pub fn filter_into<F>(&self, dest: &mut Forest<T>, pred: F) -> NodeId
    where
        F: FnMut(&Node<'a, T>) -> bool,
    {
        dest.build_planned(plan(*self, pred, |node| node.label().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    /// Returns the bracketed text of the tree.
    fn show(forest: &Forest<String>, id: NodeId) -> String {
        forest.node(id).expect("node must be alive").to_string()
    }

    const SENTENCE: &str = "(S (NP (DT the) (NN dog)) (PUNCT ,) (VP (VBD barked)) (PUNCT .))";

    #[test]
    fn filter_prunes_subtrees() {
        let mut forest = Forest::<String>::new();
        let root = forest.parse(SENTENCE).expect("should succeed");

        let mut tested = Vec::new();
        let filtered = forest.filter(root, |node| {
            tested.push(node.label().clone());
            node.label() != "NP" && node.label() != "PUNCT"
        });

        assert_eq!(show(&forest, filtered), "(S (VP (VBD barked)))");
        assert_eq!(forest.node(filtered).map(|n| n.length()), Some(1));
        assert_eq!(show(&forest, root), SENTENCE, "the source is untouched");
        assert!(
            !tested.iter().any(|label| label == "DT" || label == "S"),
            "the root and nodes under rejected nodes are not tested: {:?}",
            tested
        );
    }

    #[test]
    fn filter_leaving_empty_node() {
        let mut forest = Forest::<String>::new();
        let root = forest.parse("(S (X a b) c)").expect("should succeed");

        let filtered = forest.filter(root, |node| !node.is_leaf() || node.label() == "c");
        let node = forest.node(filtered).expect("root must be alive");
        assert_eq!(node.to_string(), "(S X c)");
        assert_eq!(node.length(), 2);
    }

    #[test]
    fn filter_inplace_updates_ancestors() {
        let mut forest = Forest::<String>::new();
        let outer = forest
            .parse(&format!("(TOP {} (EOS .))", SENTENCE))
            .expect("should succeed");
        let s = forest
            .node(outer)
            .and_then(|n| n.child(0))
            .map(|n| n.id())
            .expect("the sentence exists");

        let removed = forest.filter_inplace(s, |node| node.label() != "PUNCT");

        assert_eq!(removed, 4);
        assert_eq!(
            show(&forest, outer),
            "(TOP (S (NP (DT the) (NN dog)) (VP (VBD barked))) (EOS .))"
        );
        let s = forest.node(s).expect("the sentence is kept");
        assert_eq!(s.length(), 3);
        assert_eq!(s.root().length(), 4);
        let orders = s.children().map(|n| n.order()).collect::<Vec<_>>();
        assert_eq!(orders, [0, 1]);
    }

    #[test]
    fn relabel_keeps_shape() {
        let mut forest = Forest::<String>::new();
        let root = forest.parse(SENTENCE).expect("should succeed");

        let upper = forest.relabel(root, |node| node.label().to_uppercase());
        let copy = forest.clone_subtree(root);

        assert_eq!(
            show(&forest, upper),
            "(S (NP (DT THE) (NN DOG)) (PUNCT ,) (VP (VBD BARKED)) (PUNCT .))"
        );
        assert_eq!(show(&forest, copy), SENTENCE);
        assert_ne!(copy, root);

        let root = forest.node(root).expect("root must be alive");
        let copy = forest.node(copy).expect("copy must be alive");
        assert!(root.is_isomorphic(&copy));
        for (lhs, rhs) in root.zip_postorder(&copy).expect("same shape") {
            assert_ne!(lhs.id(), rhs.id());
            assert_eq!(lhs.label(), rhs.label());
        }
    }

    #[test]
    fn copy_into_other_forest() {
        let mut forest = Forest::<String>::new();
        let root = forest.parse(SENTENCE).expect("should succeed");
        let root = forest.node(root).expect("root must be alive");

        let mut dest = Forest::new();
        let filtered = root.filter_into(&mut dest, |node| node.label() != "PUNCT");
        assert_eq!(
            show(&dest, filtered),
            "(S (NP (DT the) (NN dog)) (VP (VBD barked)))"
        );

        let mut leaves = Forest::new();
        let flags = root.relabel_into(&mut leaves, |node| node.is_leaf());
        let flags = leaves.node(flags).expect("copy must be alive");
        assert_eq!(flags.frontier().filter(|n| *n.label()).count(), 5);
        assert_eq!(flags.preorder().filter(|n| !*n.label()).count(), 8);
    }
}
