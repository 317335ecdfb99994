//! Top-down tree builder.

use crate::forest::Forest;
use crate::id::NodeId;

/// Tree builder.
///
/// `TreeBuilder` remembers "the current node".
///
/// * [`TreeBuilder::child()`][`TreeBuilder::child`] creates a new last child
///   of the current node.
/// * [`TreeBuilder::sibling()`][`TreeBuilder::sibling`] creates a new next
///   sibling of the current node.
/// * [`TreeBuilder::parent()`][`TreeBuilder::parent`] makes the parent the
///   new current node.
///
/// Every created node starts as a leaf, and lengths of the ancestors are
/// kept up to date as the tree grows.
///
/// # Examples
///
/// ```
/// use synforest::{Forest, TreeBuilder};
///
/// let mut forest = Forest::new();
/// let mut builder = TreeBuilder::new(&mut forest, "S");
/// builder
///     .child("NP")
///     .child("DT")
///     .child("the")
///     .parent()
///     .sibling("NN")
///     .child("dog")
///     .parent()
///     .parent()
///     .sibling("VP")
///     .child("VBD")
///     .child("barked");
///
/// // Tree:
/// //  S
/// //  |-- NP
/// //  |   |-- DT
/// //  |   |   `-- the
/// //  |   `-- NN
/// //  |       `-- dog
/// //  `-- VP
/// //      `-- VBD
/// //          `-- barked (<-- current)
///
/// let root = builder.root_id();
/// let root = forest.node(root).expect("should never fail: node exists");
/// assert_eq!(root.length(), 3);
/// assert_eq!(root.to_string(), "(S (NP (DT the) (NN dog)) (VP (VBD barked)))");
/// ```
#[derive(Debug)]
pub struct TreeBuilder<'a, T> {
    /// Target forest.
    forest: &'a mut Forest<T>,
    /// Node ID of the root node.
    root: NodeId,
    /// Current node.
    current: NodeId,
}

impl<'a, T> TreeBuilder<'a, T> {
    /// Creates a root node and the tree builder for the root node.
    pub fn new(forest: &'a mut Forest<T>, root_label: T) -> Self {
        let root = forest.create_root(root_label);
        Self {
            forest,
            root,
            current: root,
        }
    }

    /// Returns a reference to the forest.
    #[inline]
    #[must_use]
    pub fn forest(&self) -> &Forest<T> {
        self.forest
    }

    /// Returns a mutable reference to the forest.
    #[inline]
    #[must_use]
    pub fn forest_mut(&mut self) -> &mut Forest<T> {
        self.forest
    }

    /// Returns the node ID of the root node.
    #[inline]
    #[must_use]
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Returns the node ID of the current node.
    #[inline]
    #[must_use]
    pub fn current_id(&self) -> NodeId {
        self.current
    }

    /// Appends a child node to the current node, and changes the current node to it.
    pub fn child(&mut self, label: T) -> &mut Self {
        let new = self.forest.create_root(label);
        self.forest
            .append_child(self.current, new)
            .expect("[consistency] a new node can always be attached");
        self.current = new;
        self
    }

    /// Adds a next sibling node to the current node, and changes the current node to it.
    ///
    /// # Panics
    ///
    /// Panics if the current node is the root of the tree.
    pub fn sibling(&mut self, label: T) -> &mut Self {
        let current = self
            .forest
            .node(self.current)
            .expect("[consistency] nodes in the tree must be alive");
        let parent = current
            .parent_id()
            .expect("[precondition] the root cannot have siblings");
        let index = current.order() + 1;

        let new = self.forest.create_root(label);
        self.forest
            .insert_child(parent, index, new)
            .expect("[consistency] the next position of an existing child is valid");
        self.current = new;
        self
    }

    /// Tries to change the current node to the parent of the current node.
    pub fn try_parent(&mut self) -> Option<&mut Self> {
        let parent = self
            .forest
            .node(self.current)
            .expect("[consistency] nodes in the tree must be alive")
            .parent_id()?;
        self.current = parent;
        Some(self)
    }

    /// Changes the current node to the parent of the current node.
    ///
    /// # Panics
    ///
    /// Panics if the current node is the root of a tree.
    pub fn parent(&mut self) -> &mut Self {
        self.try_parent()
            .expect("[precondition] the current node should not be the root")
    }
}
