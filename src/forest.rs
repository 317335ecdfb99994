//! Forest.

mod builder;
#[cfg(feature = "debug-print")]
mod debug_print;
mod edit;
mod node;
pub mod span;
pub mod traverse;

use tracing::trace;

use crate::error::StructureError;
use crate::hierarchy::{Hierarchy, Neighbors};
use crate::id::NodeId;

pub use self::builder::TreeBuilder;
#[cfg(feature = "debug-print")]
pub use self::debug_print::DebugPrint;
pub use self::node::Node;

/// Forest: an arena of labeled trees.
///
/// Every node has a label of type `T`, an ordered list of children, an
/// optional parent, its index among its siblings, and the number of leaves
/// under it. Structural edits are done through the forest so that these
/// values stay consistent.
#[derive(Debug, Clone)]
pub struct Forest<T> {
    /// Hierarchy.
    hierarchy: Hierarchy,
    /// Labels.
    ///
    /// `None` is used for removed nodes.
    labels: Vec<Option<T>>,
}

impl<T> Forest<T> {
    /// Creates a new empty forest.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::new();
    ///
    /// let id = forest.create_root("NN");
    /// assert_eq!(forest.label(id).copied(), Some("NN"));
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the node exists and is not yet removed.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.hierarchy.is_alive(id)
    }

    /// Returns a [proxy object][`Node`] to the node.
    ///
    /// Returns `None` if the node has been removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let id = forest.create_root("NN");
    ///
    /// let node = forest.node(id).expect("should never fail: node exists");
    ///
    /// assert_eq!(*node.label(), "NN");
    /// assert!(node.parent().is_none(), "the root node does not have a parent");
    /// assert_eq!(node.length(), 1);
    /// ```
    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_, T>> {
        Node::new(self, id)
    }

    /// Returns a reference to the label of the node.
    #[inline]
    #[must_use]
    pub fn label(&self, id: NodeId) -> Option<&T> {
        self.labels.get(id.get()).and_then(|entry| entry.as_ref())
    }

    /// Returns a mutable reference to the label of the node.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let id = forest.create_root("NN");
    ///
    /// *forest.label_mut(id).expect("should never fail: node exists") = "NNS";
    ///
    /// assert_eq!(forest.label(id).copied(), Some("NNS"));
    /// ```
    #[inline]
    #[must_use]
    pub fn label_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.labels.get_mut(id.get()).and_then(|entry| entry.as_mut())
    }

    /// Returns a reference to the neighbors data associated to the node.
    #[inline]
    #[must_use]
    pub(crate) fn neighbors(&self, id: NodeId) -> Option<&Neighbors> {
        self.hierarchy.neighbors(id)
    }

    /// Returns the hierarchy.
    #[inline]
    #[must_use]
    pub(crate) fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Creates a new root node without children, i.e. a leaf.
    ///
    /// # Panics
    ///
    /// Panics if the node ID overflows.
    pub fn create_root(&mut self, label: T) -> NodeId {
        let new_id = self.hierarchy.create_root();
        assert_eq!(
            self.labels.len(),
            new_id.get(),
            "[consistency] node ID must be able to be used as an index for the vec"
        );
        self.labels.push(Some(label));

        new_id
    }

    /// Creates a new root node which adopts the given root nodes as its
    /// children, in order.
    ///
    /// The length of the new node is the sum of the lengths of the children,
    /// or 1 if no children are given.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::AlreadyAttached`] if any of the children
    /// already has a parent, or if a node is given twice. Nothing is created
    /// in that case.
    ///
    /// # Panics
    ///
    /// Panics if any of the children is not alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::Forest;
    ///
    /// let mut forest = Forest::new();
    /// let the = forest.create_root("the");
    /// let dt = forest.create_node("DT", [the])?;
    /// let dog = forest.create_root("dog");
    /// let nn = forest.create_node("NN", [dog])?;
    /// let np = forest.create_node("NP", [dt, nn])?;
    ///
    /// let node = forest.node(np).expect("should never fail: node exists");
    /// assert_eq!(node.length(), 2);
    /// assert_eq!(node.to_string(), "(NP (DT the) (NN dog))");
    /// # Ok::<_, synforest::StructureError>(())
    /// ```
    pub fn create_node<I>(&mut self, label: T, children: I) -> Result<NodeId, StructureError>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let children = children.into_iter().collect::<Vec<_>>();
        let new_id = self.hierarchy.create_with_children(&children)?;
        assert_eq!(
            self.labels.len(),
            new_id.get(),
            "[consistency] node ID must be able to be used as an index for the vec"
        );
        self.labels.push(Some(label));

        Ok(new_id)
    }

    /// Inserts the root node `child` as the `index`-th child of `parent`.
    ///
    /// Subsequent children are shifted. If `parent` was a leaf, its length
    /// becomes the length of `child`; otherwise the length of `child` is
    /// added. Lengths of the ancestors are updated accordingly.
    ///
    /// # Errors
    ///
    /// * [`StructureError::AlreadyAttached`] if `child` has a parent.
    /// * [`StructureError::AncestorDescendantLoop`] if `child` is `parent`
    ///   or an ancestor of `parent`.
    /// * [`StructureError::IndexOutOfRange`] if `index` is greater than the
    ///   number of children of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if any of the given nodes is not alive.
    #[inline]
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), StructureError> {
        self.hierarchy.insert_child(parent, index, child)
    }

    /// Inserts the root node `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Same as [`insert_child`][`Self::insert_child`], except that the index
    /// is always valid.
    ///
    /// # Panics
    ///
    /// Panics if any of the given nodes is not alive.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), StructureError> {
        let index = self
            .neighbors(parent)
            .expect("[precondition] the parent must be alive")
            .children()
            .len();
        self.hierarchy.insert_child(parent, index, child)
    }

    /// Detaches the child of `parent` at the given position and returns it.
    ///
    /// The detached child becomes a root and stays in the forest. A parent
    /// left without children becomes a leaf, whose length is 1.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfRange`] if there is no child at
    /// the position.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use synforest::{ChildPos, Forest};
    ///
    /// let mut forest = Forest::<String>::new();
    /// let root = forest.parse("(NP (DT the) (JJ big) (NN dog))")?;
    ///
    /// let last = forest.delete_child(root, ChildPos::Last)?;
    /// let first = forest.delete_child(root, 0)?;
    ///
    /// assert_eq!(forest.node(root).map(|n| n.to_string()).as_deref(), Some("(NP (JJ big))"));
    /// assert_eq!(forest.node(last).map(|n| n.to_string()).as_deref(), Some("(NN dog)"));
    /// assert!(forest.node(first).map_or(false, |n| n.is_root()));
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn delete_child<P>(&mut self, parent: NodeId, pos: P) -> Result<NodeId, StructureError>
    where
        P: Into<ChildPos>,
    {
        let index = match pos.into() {
            ChildPos::At(index) => index,
            ChildPos::Last => {
                let len = self
                    .neighbors(parent)
                    .expect("[precondition] the parent must be alive")
                    .children()
                    .len();
                match len.checked_sub(1) {
                    Some(v) => v,
                    None => return Err(StructureError::IndexOutOfRange { index: 0, len }),
                }
            }
        };
        self.hierarchy.delete_child(parent, index)
    }

    /// Detaches the node from its parent.
    ///
    /// Tree structure under the given node is preserved, and the node
    /// becomes a root.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NoParent`] if the node is a root.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    #[inline]
    pub fn detach(&mut self, node: NodeId) -> Result<(), StructureError> {
        self.hierarchy.detach(node).map(|_parent| ())
    }

    /// Removes the node with its descendants, and then removes the ancestors
    /// left without children.
    ///
    /// Pruning stops at the root of the tree: a root left without children
    /// stays in the forest as a leaf.
    ///
    /// ```text
    /// Before `delete_clean(1-0-0)`:
    ///
    /// root
    /// |-- 0
    /// `-- 1
    ///     `-- 1-0
    ///         `-- 1-0-0
    ///
    /// After:
    ///
    /// root
    /// `-- 0
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NoParent`] if the node is a root. Nothing
    /// is removed in that case.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub fn delete_clean(&mut self, node: NodeId) -> Result<(), StructureError> {
        let mut parent = self.hierarchy.detach(node)?;
        self.remove_subtree(node);

        loop {
            let nbs = self
                .neighbors(parent)
                .expect("[consistency] the former parent must be alive");
            if !nbs.is_leaf() {
                break;
            }
            let grandparent = match nbs.parent() {
                Some(v) => v,
                None => break,
            };
            trace!(node = ?parent, "pruning ancestor left without children");
            self.remove_subtree(parent);
            parent = grandparent;
        }

        Ok(())
    }

    /// Removes the node and all of its descendants from the forest.
    ///
    /// The node is detached from its parent first if it has one. Returns the
    /// number of removed nodes.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub fn remove_subtree(&mut self, node: NodeId) -> usize {
        let removed = self.hierarchy.remove_subtree(node);
        for id in &removed {
            self.labels[id.get()] = None;
        }

        removed.len()
    }

    /// Returns a printable tree for debugging.
    ///
    /// Returns `None` if the node is not alive.
    #[cfg(feature = "debug-print")]
    #[inline]
    #[must_use]
    pub fn debug_print(&self, id: NodeId) -> Option<DebugPrint<'_, T>> {
        self.node(id).map(|node| node.debug_print())
    }
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self {
            hierarchy: Default::default(),
            labels: Default::default(),
        }
    }
}

/// Position of a child to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildPos {
    /// The child at the index.
    At(usize),
    /// The last child.
    Last,
}

impl From<usize> for ChildPos {
    #[inline]
    fn from(index: usize) -> Self {
        Self::At(index)
    }
}
