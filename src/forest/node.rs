//! Node.

use core::fmt;
use core::ptr;

use crate::error::StructureError;
use crate::forest::traverse::{
    Ancestors, Children, DepthFirstTraverse, DftEvent, Frontier, Postorder, Preorder,
    ZipPostorder,
};
use crate::forest::Forest;
use crate::hierarchy::{Hierarchy, Neighbors};
use crate::id::NodeId;

/// Immutable reference to a node.
///
/// This type guarantees that the node ID is present in the internal
/// storage of the forest and is not removed yet.
pub struct Node<'a, T> {
    /// Forest.
    forest: &'a Forest<T>,
    /// Node ID.
    id: NodeId,
}

impl<'a, T> Node<'a, T> {
    /// Creates a new `Node` object.
    #[must_use]
    pub(super) fn new(forest: &'a Forest<T>, id: NodeId) -> Option<Self> {
        if !forest.is_alive(id) {
            return None;
        }
        Some(Self { forest, id })
    }

    /// Creates a `Node` object for a node known to be alive.
    #[inline]
    #[must_use]
    pub(crate) fn new_alive(forest: &'a Forest<T>, id: NodeId) -> Self {
        Self::new(forest, id).expect("[consistency] the node must be the part of the tree")
    }

    /// Returns the node ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the forest the node belongs to.
    #[inline]
    #[must_use]
    pub fn forest(&self) -> &'a Forest<T> {
        self.forest
    }

    /// Returns the hierarchy of the forest.
    #[inline]
    #[must_use]
    pub(crate) fn hierarchy(&self) -> &'a Hierarchy {
        self.forest.hierarchy()
    }

    /// Returns the neighbors of the node.
    #[must_use]
    fn neighbors(&self) -> &'a Neighbors {
        self.forest
            .neighbors(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns a reference to the label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &'a T {
        self.forest
            .label(self.id)
            .expect("[validity] the node has been checked to be alive")
    }

    /// Returns the node ID of the parent.
    #[inline]
    #[must_use]
    pub fn parent_id(&self) -> Option<NodeId> {
        self.neighbors().parent()
    }

    /// Returns the parent node.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.parent_id().map(|id| {
            Self::new(self.forest, id).expect("[consistency] the parent must be alive")
        })
    }

    /// Returns the index of the node among the children of its parent.
    ///
    /// A root has order 0.
    #[inline]
    #[must_use]
    pub fn order(&self) -> usize {
        self.neighbors().order()
    }

    /// Returns the number of leaves under the node.
    ///
    /// A leaf has length 1.
    #[inline]
    #[must_use]
    pub fn length(&self) -> usize {
        self.neighbors().length()
    }

    /// Returns the node IDs of the children.
    #[inline]
    #[must_use]
    pub fn children_ids(&self) -> &'a [NodeId] {
        self.neighbors().children()
    }

    /// Returns an iterator of the children.
    #[inline]
    #[must_use]
    pub fn children(&self) -> Children<'a, T> {
        Children::with_parent(self)
    }

    /// Returns the number of children.
    #[inline]
    #[must_use]
    pub fn num_children(&self) -> usize {
        self.children_ids().len()
    }

    /// Returns the `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Option<Self> {
        self.children_ids().get(index).map(|&id| {
            Self::new(self.forest, id).expect("[consistency] the child must be alive")
        })
    }

    /// Returns the next sibling node.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.neighbors()
            .next_sibling(self.hierarchy())
            .map(|id| Self::new(self.forest, id).expect("[consistency] the sibling must be alive"))
    }

    /// Returns the previous sibling node.
    #[must_use]
    pub fn prev_sibling(&self) -> Option<Self> {
        self.neighbors()
            .prev_sibling(self.hierarchy())
            .map(|id| Self::new(self.forest, id).expect("[consistency] the sibling must be alive"))
    }

    /// Returns true if the node has no parent.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id().is_none()
    }

    /// Returns true if the node has no children, i.e. is a terminal.
    #[inline]
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.neighbors().is_leaf()
    }

    /// Returns true if the node has exactly one child and the child is a leaf.
    #[must_use]
    pub fn is_preterminal(&self) -> bool {
        match self.children_ids() {
            [only] => self
                .forest
                .neighbors(*only)
                .expect("[consistency] the child must be alive")
                .is_leaf(),
            _ => false,
        }
    }

    /// Returns the root of the tree the node belongs to.
    #[must_use]
    pub fn root(&self) -> Self {
        self.ancestors()
            .last()
            .expect("[consistency] ancestors contain the node itself")
    }

    /// Returns the node at the Gorn address relative to this node.
    ///
    /// The empty address is the node itself, `[0]` is the first child,
    /// `[0, 2]` is the third child of the first child, and so on.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfRange`] if an index in the address
    /// exceeds the number of children at that depth.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::{Forest, StructureError};
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(S (NP (DT the) (NN dog)) (VP (VBD barked)))")?;
    /// let root = forest.node(root).expect("should never fail: node exists");
    ///
    /// assert_eq!(root.at(&[])?.label(), "S");
    /// assert_eq!(root.at(&[0, 1])?.label(), "NN");
    /// assert_eq!(root.at(&[0, 1, 0])?.label(), "dog");
    /// assert_eq!(
    ///     root.at(&[1, 1]).map(|n| n.id()),
    ///     Err(StructureError::IndexOutOfRange { index: 1, len: 1 })
    /// );
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    #[doc(alias = "descendant")]
    pub fn at(&self, address: &[usize]) -> Result<Self, StructureError> {
        let mut current = *self;
        for &index in address {
            let children = current.children_ids();
            let id = *children
                .get(index)
                .ok_or(StructureError::IndexOutOfRange {
                    index,
                    len: children.len(),
                })?;
            current = Self::new_alive(self.forest, id);
        }
        Ok(current)
    }

    /// Returns the depth-first traverser.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::{DftEvent, Forest};
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(NP (DT the) dog)")?;
    /// let root = forest.node(root).expect("should never fail: node exists");
    ///
    /// let events = root
    ///     .depth_first_traverse()
    ///     .map(|ev| ev.map(|node| node.label().as_str()))
    ///     .collect::<Vec<_>>();
    /// assert_eq!(
    ///     events,
    ///     [
    ///         DftEvent::Open("NP"),
    ///         DftEvent::Open("DT"),
    ///         DftEvent::Open("the"),
    ///         DftEvent::Close("the"),
    ///         DftEvent::Close("DT"),
    ///         DftEvent::Open("dog"),
    ///         DftEvent::Close("dog"),
    ///         DftEvent::Close("NP"),
    ///     ]
    /// );
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    #[inline]
    #[must_use]
    pub fn depth_first_traverse(&self) -> DepthFirstTraverse<'a, T> {
        DepthFirstTraverse::with_toplevel(self)
    }

    /// Returns an iterator of the subtree visiting each node before its children.
    #[inline]
    #[must_use]
    pub fn preorder(&self) -> Preorder<'a, T> {
        Preorder::with_toplevel(self)
    }

    /// Returns an iterator of the subtree visiting each node after its children.
    #[inline]
    #[must_use]
    pub fn postorder(&self) -> Postorder<'a, T> {
        Postorder::with_toplevel(self)
    }

    /// Returns an iterator of the leaves under the node, from left to right.
    ///
    /// A leaf yields only itself.
    #[inline]
    #[must_use]
    pub fn frontier(&self) -> Frontier<'a, T> {
        Frontier::with_toplevel(self)
    }

    /// Returns the labels of the leaves under the node, from left to right.
    #[must_use]
    pub fn yield_labels(&self) -> Vec<&'a T> {
        self.frontier().map(|leaf| leaf.label()).collect()
    }

    /// Returns an iterator of the node itself and its ancestors, toward the root.
    #[inline]
    #[must_use]
    pub fn ancestors(&self) -> Ancestors<'a, T> {
        Ancestors::with_start(self)
    }

    /// Returns true if `other` is this node or one of its ancestors.
    #[must_use]
    pub fn is_dominated_by(&self, other: NodeId) -> bool {
        self.hierarchy().is_ancestor_or_self(other, self.id)
    }

    /// Returns true if this node is `other` or one of the ancestors of `other`.
    ///
    /// Returns false if `other` is not alive.
    #[must_use]
    pub fn dominates(&self, other: NodeId) -> bool {
        self.forest.is_alive(other) && self.hierarchy().is_ancestor_or_self(self.id, other)
    }

    /// Returns true if this node dominates every given node.
    ///
    /// Returns true for an empty collection.
    #[must_use]
    pub fn dominates_all<I>(&self, nodes: I) -> bool
    where
        I: IntoIterator<Item = NodeId>,
    {
        nodes.into_iter().all(|node| self.dominates(node))
    }

    /// Returns the nearest proper ancestor which satisfies the predicate.
    #[must_use]
    pub fn find_ancestor<F>(&self, mut pred: F) -> Option<Self>
    where
        F: FnMut(&Self) -> bool,
    {
        self.ancestors().skip(1).find(|node| pred(node))
    }

    /// Returns the topmost proper descendants which satisfy the predicate.
    ///
    /// Search does not descend below a node satisfying the predicate, so a
    /// matching node shadows the matching nodes under it. The result is in
    /// preorder.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(S (NP (NP (DT the) (NN dog)) (PP (IN of) (NP me))) (VP barked))")?;
    /// let root = forest.node(root).expect("should never fail: node exists");
    ///
    /// let nps = root.find_descendants(|node| node.label() == "NP");
    /// assert_eq!(nps.len(), 1, "the inner noun phrases are shadowed");
    /// assert_eq!(nps[0].length(), 4);
    /// # Ok::<_, synforest::ParseError>(())
    /// ```
    #[must_use]
    pub fn find_descendants<F>(&self, mut pred: F) -> Vec<Self>
    where
        F: FnMut(&Self) -> bool,
    {
        let mut found = Vec::new();
        for child in self.children() {
            child.find_descendants_into(&mut pred, &mut found);
        }
        found
    }

    /// Appends the topmost nodes in the subtree which satisfy the predicate.
    ///
    /// Unlike [`find_descendants`][`Self::find_descendants`], the node itself
    /// is tested first: if it satisfies the predicate, only the node itself
    /// is appended.
    pub fn find_descendants_into<F>(&self, mut pred: F, found: &mut Vec<Self>)
    where
        F: FnMut(&Self) -> bool,
    {
        let mut events = self.depth_first_traverse();
        while let Some(ev) = events.next() {
            let node = match ev {
                DftEvent::Open(node) => node,
                DftEvent::Close(_) => continue,
            };
            if !pred(&node) {
                continue;
            }
            found.push(node);
            // Skip the subtree of the found node.
            for ev in &mut events {
                if ev == DftEvent::Close(node) {
                    break;
                }
            }
        }
    }

    /// Returns true if the two subtrees have the same shape.
    ///
    /// Labels are not compared.
    #[must_use]
    pub fn is_isomorphic<U>(&self, other: &Node<'_, U>) -> bool {
        let mut lhs = self.depth_first_traverse();
        let mut rhs = other.depth_first_traverse();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return true,
                (Some(DftEvent::Open(_)), Some(DftEvent::Open(_)))
                | (Some(DftEvent::Close(_)), Some(DftEvent::Close(_))) => {}
                _ => return false,
            }
        }
    }

    /// Returns an iterator of the pairs of corresponding nodes of two trees
    /// with the same shape, in postorder.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ShapeMismatch`] if the trees do not have the
    /// same shape.
    pub fn zip_postorder<'b, U>(
        &self,
        other: &Node<'b, U>,
    ) -> Result<ZipPostorder<'a, 'b, T, U>, StructureError> {
        if !self.is_isomorphic(other) {
            return Err(StructureError::ShapeMismatch);
        }
        Ok(ZipPostorder::new(self.postorder(), other.postorder()))
    }
}

// Manual impls, since derived ones would require `T: Clone`.
impl<T> Clone for Node<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Node<'_, T> {}

/// Two nodes are equal if they are the same node of the same forest.
impl<T> PartialEq for Node<'_, T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.forest, other.forest) && self.id == other.id
    }
}

impl<T> Eq for Node<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Node<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("label", self.label())
            .finish()
    }
}
