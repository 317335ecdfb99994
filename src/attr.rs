//! Per-node attributes kept outside of the forest.
//!
//! Labels are the only data stored in a [`Forest`][`crate::Forest`]. Other
//! annotations (scores, alignment IDs, spans, ...) live in [`NodeMap`]s
//! keyed by [`NodeId`], and can be transferred between trees of the same
//! shape with [`NodeMap::set_attr_from`].

use core::fmt;
use core::ops;

use crate::error::StructureError;
use crate::forest::Node;
use crate::id::NodeId;

/// Map from nodes to values.
///
/// Values are stored in a vec indexed by the node ID, in the same way the
/// forest stores labels.
#[derive(Clone, PartialEq, Eq)]
pub struct NodeMap<V> {
    /// Values.
    ///
    /// `None` is used for nodes without a value.
    values: Vec<Option<V>>,
    /// Number of nodes with a value.
    len: usize,
}

impl<V> NodeMap<V> {
    /// Creates a new empty map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes with a value.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no node has a value.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the value for the node.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&V> {
        self.values.get(id.get()).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to the value for the node.
    #[inline]
    #[must_use]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.values.get_mut(id.get()).and_then(Option::as_mut)
    }

    /// Returns true if the node has a value.
    #[inline]
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Sets the value for the node, and returns the old value if any.
    pub fn insert(&mut self, id: NodeId, value: V) -> Option<V> {
        let index = id.get();
        if self.values.len() <= index {
            self.values.resize_with(index + 1, || None);
        }
        let old = self.values[index].replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Removes the value for the node and returns it.
    pub fn remove(&mut self, id: NodeId) -> Option<V> {
        let old = self.values.get_mut(id.get()).and_then(Option::take);
        if old.is_some() {
            self.len -= 1;
        }
        old
    }

    /// Returns an iterator of the nodes with values, in the order of node IDs.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &V)> + '_ {
        self.values.iter().enumerate().filter_map(|(index, value)| {
            let id = NodeId::from_usize(index)
                .expect("[consistency] the index has been created from a node ID");
            value.as_ref().map(|value| (id, value))
        })
    }
}

impl<V: Clone> NodeMap<V> {
    /// Sets values for the nodes of the tree `dest` from the corresponding
    /// nodes of the tree `source`.
    ///
    /// The two trees are walked in lock-step preorder. For each pair of
    /// nodes, the value of `source_attr(source_node)` is set to the
    /// `dest_node`. When `source_attr` returns `None`, `missing` decides
    /// whether a default is set or the node is left untouched.
    ///
    /// The trees may belong to different forests with different label types.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::ShapeMismatch`] if the two trees do not have
    /// the same shape. The map is not modified in that case.
    ///
    /// # Examples
    ///
    /// Copy words of a tree onto a relabeled copy of it:
    ///
    /// ```
    /// use synforest::{Forest, Missing, NodeMap};
    ///
    /// let mut forest = Forest::<String>::new();
    /// let tree = forest.parse("(NP (DT the) (NN dog))")?;
    /// let copy = forest.relabel(tree, |node| node.label().to_lowercase());
    ///
    /// let mut words = NodeMap::new();
    /// let source = forest.node(tree).expect("should never fail: node exists");
    /// let dest = forest.node(copy).expect("should never fail: node exists");
    /// words.set_attr_from(
    ///     &dest,
    ///     &source,
    ///     |node| node.is_leaf().then(|| node.label().clone()),
    ///     Missing::Skip,
    /// )?;
    ///
    /// let dog = dest.at(&[1, 0])?;
    /// assert_eq!(words.get(dog.id()).map(String::as_str), Some("dog"));
    /// assert_eq!(words.len(), 2);
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn set_attr_from<T, U, F>(
        &mut self,
        dest: &Node<'_, T>,
        source: &Node<'_, U>,
        mut source_attr: F,
        missing: Missing<V>,
    ) -> Result<(), StructureError>
    where
        F: FnMut(&Node<'_, U>) -> Option<V>,
    {
        if !dest.is_isomorphic(source) {
            return Err(StructureError::ShapeMismatch);
        }

        for (dest_node, source_node) in dest.preorder().zip(source.preorder()) {
            match (source_attr(&source_node), &missing) {
                (Some(value), _) => {
                    self.insert(dest_node.id(), value);
                }
                (None, Missing::Default(default)) => {
                    self.insert(dest_node.id(), default.clone());
                }
                (None, Missing::Skip) => {}
            }
        }

        Ok(())
    }
}

impl<V> Default for NodeMap<V> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            len: 0,
        }
    }
}

impl<V> ops::Index<NodeId> for NodeMap<V> {
    type Output = V;

    /// Returns the value for the node.
    ///
    /// # Panics
    ///
    /// Panics if the node has no value.
    fn index(&self, id: NodeId) -> &V {
        self.get(id)
            .expect("[precondition] the node must have a value in the map")
    }
}

impl<V> FromIterator<(NodeId, V)> for NodeMap<V> {
    fn from_iter<I: IntoIterator<Item = (NodeId, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<V> Extend<(NodeId, V)> for NodeMap<V> {
    fn extend<I: IntoIterator<Item = (NodeId, V)>>(&mut self, iter: I) {
        for (id, value) in iter {
            self.insert(id, value);
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// What to do when the source attribute is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Missing<V> {
    /// Set the given value.
    Default(V),
    /// Leave the destination node untouched.
    Skip,
}
