//! Spans of leaves covered by nodes.

use core::fmt;

use std::collections::BTreeMap;

use crate::attr::NodeMap;
use crate::forest::traverse::DftEvent;
use crate::forest::Node;
use crate::id::NodeId;

/// Half-open interval of leaf positions.
///
/// Leaves are numbered from 0, from left to right, relative to the node the
/// spans are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// First leaf position.
    pub start: usize,
    /// Leaf position next to the last.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the number of leaves in the span.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no leaves.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the span contains the other one.
    #[inline]
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<'a, T> Node<'a, T> {
    /// Returns the nodes grouped by the span they cover.
    ///
    /// Nodes in a group are in top-down order, e.g. a unary chain
    /// `(NP (NN dog))` gives `[NP, NN, dog]` for the same span.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::{Forest, Span};
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(S (NP (DT the) (NN dog)) (VP (VBD barked)))")?;
    /// let root = forest.node(root).expect("should never fail: node exists");
    ///
    /// let by_span = root.nodes_by_span();
    /// let labels = |span| {
    ///     by_span[&span]
    ///         .iter()
    ///         .map(|&id| forest.label(id).map(String::as_str))
    ///         .collect::<Option<Vec<_>>>()
    /// };
    /// assert_eq!(labels(Span::new(0, 3)), Some(vec!["S"]));
    /// assert_eq!(labels(Span::new(0, 2)), Some(vec!["NP"]));
    /// assert_eq!(labels(Span::new(2, 3)), Some(vec!["VP", "VBD", "barked"]));
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    #[must_use]
    pub fn nodes_by_span(&self) -> BTreeMap<Span, Vec<NodeId>> {
        let mut by_span: BTreeMap<Span, Vec<NodeId>> = BTreeMap::new();
        // Number of leaves seen so far.
        let mut position = 0;

        for ev in self.depth_first_traverse() {
            match ev {
                DftEvent::Open(node) => {
                    let span = Span::new(position, position + node.length());
                    by_span.entry(span).or_default().push(node.id());
                }
                DftEvent::Close(node) => {
                    if node.is_leaf() {
                        position += 1;
                    }
                }
            }
        }

        by_span
    }

    /// Returns the span of every node in the subtree.
    ///
    /// Leaves get unit spans from left to right, and an internal node spans
    /// from the start of its first child to the end of its last child.
    #[must_use]
    pub fn spans_by_node(&self) -> NodeMap<Span> {
        let mut spans: NodeMap<Span> = NodeMap::new();
        let mut next_leaf = 0;

        for node in self.postorder() {
            let span = match (node.children_ids().first(), node.children_ids().last()) {
                (Some(&first), Some(&last)) => Span::new(spans[first].start, spans[last].end),
                _ => {
                    next_leaf += 1;
                    Span::new(next_leaf - 1, next_leaf)
                }
            };
            spans.insert(node.id(), span);
        }

        spans
    }

    /// Returns the span of the node relative to the root of its tree.
    #[must_use]
    pub fn span(&self) -> Span {
        // Leaves in the preceding siblings of the node and of its ancestors.
        let start = self
            .ancestors()
            .flat_map(|node| {
                node.parent()
                    .into_iter()
                    .flat_map(move |parent| parent.children().take(node.order()))
            })
            .map(|preceding| preceding.length())
            .sum();

        Span::new(start, start + self.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::forest::Forest;

    #[test]
    fn spans_agree() {
        let mut forest = Forest::<String>::new();
        let root = forest
            .parse("(S (NP (DT the) (JJ big) (NN dog)) (VP (VBD barked) (ADVP (RB loudly))))")
            .expect("should succeed");
        let root = forest.node(root).expect("root must be alive");

        let by_span = root.nodes_by_span();
        let by_node = root.spans_by_node();
        for node in root.preorder() {
            let span = by_node[node.id()];
            assert!(
                by_span[&span].contains(&node.id()),
                "{:?} should be found at {}",
                node,
                span
            );
            assert_eq!(node.span(), span);
            assert_eq!(span.len(), node.length());
        }
        assert_eq!(by_node[root.id()], Span::new(0, 5));
    }

    #[test]
    fn spans_of_subtree_are_relative() {
        let mut forest = Forest::<String>::new();
        let root = forest
            .parse("(S (NP (DT the) (NN dog)) (VP (VBD barked)))")
            .expect("should succeed");
        let root = forest.node(root).expect("root must be alive");
        let vp = root.at(&[1]).expect("address must be valid");

        assert_eq!(vp.span(), Span::new(2, 3));
        assert_eq!(vp.spans_by_node()[vp.id()], Span::new(0, 1));
        assert_eq!(
            vp.nodes_by_span().keys().copied().collect::<Vec<_>>(),
            [Span::new(0, 1)]
        );
    }

    #[test]
    fn span_helpers() {
        let outer = Span::new(1, 4);
        assert!(outer.contains(&Span::new(2, 4)));
        assert!(!outer.contains(&Span::new(0, 2)));
        assert_eq!(outer.len(), 3);
        assert!(Span::new(2, 2).is_empty());
        assert_eq!(outer.to_string(), "[1, 4)");
    }
}
