//! Hierarchy of the trees in a forest, without labels.

pub(crate) mod traverse;

use core::fmt;

use crate::error::StructureError;
use crate::id::NodeId;

use self::traverse::{DepthFirstTraverser, DftEvent};

/// A forest without labels tied to nodes.
#[derive(Debug, Clone, Default)]
pub(crate) struct Hierarchy {
    /// Neighbors storage, indexed by node ID.
    neighbors: Vec<Neighbors>,
}

impl Hierarchy {
    /// Creates a new root node without children.
    ///
    /// # Panics
    ///
    /// Panics if the node ID overflows.
    pub(crate) fn create_root(&mut self) -> NodeId {
        let new_id = NodeId::from_usize(self.neighbors.len())
            .expect("[precondition] node ID overflowed presumably due to too many node creations");
        self.neighbors.push(Neighbors::new_root());

        new_id
    }

    /// Creates a new root node adopting the given root nodes as its children.
    ///
    /// Nothing is created if an error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::AlreadyAttached`] if any of the children
    /// has a parent or if the same node is given twice.
    ///
    /// # Panics
    ///
    /// Panics if any of the children is not alive.
    pub(crate) fn create_with_children(
        &mut self,
        children: &[NodeId],
    ) -> Result<NodeId, StructureError> {
        for (i, &child) in children.iter().enumerate() {
            let nbs = self
                .neighbors(child)
                .expect("[precondition] the child must be alive");
            if nbs.parent.is_some() || children[..i].contains(&child) {
                return Err(StructureError::AlreadyAttached);
            }
        }

        let new_id = self.create_root();
        let mut length = 0;
        for (order, &child) in children.iter().enumerate() {
            let child_nbs = self
                .neighbors_mut(child)
                .expect("[consistency] the child has been checked to be alive");
            child_nbs.parent = Some(new_id);
            child_nbs.order = order;
            length += child_nbs.length;
        }
        let nbs = self
            .neighbors_mut(new_id)
            .expect("[consistency] the node has just been created");
        nbs.children = children.to_vec();
        if !children.is_empty() {
            nbs.length = length;
        }

        Ok(new_id)
    }

    /// Returns a reference to the neighbors for the node if the node is alive.
    ///
    /// Returns `None` if the node ID is invalid or the node has already been removed.
    #[must_use]
    pub(crate) fn neighbors(&self, id: NodeId) -> Option<&Neighbors> {
        self.neighbors.get(id.get()).filter(|v| v.is_alive())
    }

    /// Returns a mutable reference to the neighbors for the node if the node is alive.
    ///
    /// Returns `None` if the node ID is invalid or the node has already been removed.
    #[must_use]
    fn neighbors_mut(&mut self, id: NodeId) -> Option<&mut Neighbors> {
        self.neighbors
            .get_mut(id.get())
            .filter(|v| v.is_alive())
    }

    /// Returns true if the node is alive.
    #[must_use]
    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        self.neighbors.get(id.get()).map_or(false, |v| v.is_alive())
    }

    /// Returns true if `ancestor` is `node` itself or an ancestor of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not alive.
    #[must_use]
    pub(crate) fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self
                .neighbors(id)
                .expect("[precondition] the node must be alive")
                .parent;
        }
        false
    }

    /// Sets the length of the node and propagates the change to the ancestors.
    fn set_length(&mut self, node: NodeId, new_len: usize) {
        let nbs = self
            .neighbors_mut(node)
            .expect("[precondition] the node must be alive");
        let mut old_len = nbs.length;
        let mut new_len = new_len;
        nbs.length = new_len;
        let mut current = nbs.parent;

        while old_len != new_len {
            let parent = match current {
                Some(v) => v,
                None => break,
            };
            let parent_nbs = self
                .neighbors_mut(parent)
                .expect("[consistency] the parent of a live node must be alive");
            let parent_old = parent_nbs.length;
            // The old length of the child is a part of the parent's length.
            parent_nbs.length = parent_old - old_len + new_len;
            old_len = parent_old;
            new_len = parent_nbs.length;
            current = parent_nbs.parent;
        }
    }

    /// Renumbers `order` of the children of `parent` starting from `start`.
    fn renumber_children(&mut self, parent: NodeId, start: usize) {
        let count = self
            .neighbors(parent)
            .expect("[precondition] the parent must be alive")
            .children
            .len();
        for order in start..count {
            let child = self.neighbors[parent.get()].children[order];
            self.neighbors_mut(child)
                .expect("[consistency] children of a live node must also be alive")
                .order = order;
        }
    }

    /// Inserts the root node `child` as the child of `parent` at `index`.
    ///
    /// ```text
    /// Before `insert_child(parent, 1, new)`:
    ///
    /// parent
    /// |-- 0
    /// `-- 1
    ///
    /// new
    /// `-- new-0
    ///
    /// After:
    ///
    /// parent
    /// |-- 0
    /// |-- new
    /// |   `-- new-0
    /// `-- 1
    /// ```
    ///
    /// # Errors
    ///
    /// * [`StructureError::AlreadyAttached`] if `child` has a parent.
    /// * [`StructureError::AncestorDescendantLoop`] if `child` is `parent`
    ///   or an ancestor of `parent`.
    /// * [`StructureError::IndexOutOfRange`] if `index` is greater than the
    ///   number of children.
    ///
    /// # Panics
    ///
    /// Panics if any of the given nodes is not alive.
    pub(crate) fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), StructureError> {
        let child_nbs = self
            .neighbors(child)
            .expect("[precondition] the child must be alive");
        if child_nbs.parent.is_some() {
            return Err(StructureError::AlreadyAttached);
        }
        let child_len = child_nbs.length;
        let parent_nbs = self
            .neighbors(parent)
            .expect("[precondition] the parent must be alive");
        let len = parent_nbs.children.len();
        if index > len {
            return Err(StructureError::IndexOutOfRange { index, len });
        }
        let was_leaf = parent_nbs.is_leaf();
        let parent_len = parent_nbs.length;
        if self.is_ancestor_or_self(child, parent) {
            return Err(StructureError::AncestorDescendantLoop);
        }

        self.neighbors_mut(parent)
            .expect("[consistency] the parent has been checked to be alive")
            .children
            .insert(index, child);
        self.neighbors_mut(child)
            .expect("[consistency] the child has been checked to be alive")
            .parent = Some(parent);
        self.renumber_children(parent, index);
        // A leaf turns into an internal node, so its own unit length goes away.
        let new_len = if was_leaf {
            child_len
        } else {
            parent_len + child_len
        };
        self.set_length(parent, new_len);

        Ok(())
    }

    /// Detaches the child at `index` from `parent` and returns it.
    ///
    /// The detached child becomes a root. A parent left without children
    /// becomes a leaf.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::IndexOutOfRange`] if `parent` has no child
    /// at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not alive.
    pub(crate) fn delete_child(
        &mut self,
        parent: NodeId,
        index: usize,
    ) -> Result<NodeId, StructureError> {
        let parent_nbs = self
            .neighbors_mut(parent)
            .expect("[precondition] the parent must be alive");
        let len = parent_nbs.children.len();
        if index >= len {
            return Err(StructureError::IndexOutOfRange { index, len });
        }
        let child = parent_nbs.children.remove(index);
        let parent_len = parent_nbs.length;
        let now_leaf = parent_nbs.is_leaf();

        let child_nbs = self
            .neighbors_mut(child)
            .expect("[consistency] children of a live node must also be alive");
        child_nbs.parent = None;
        child_nbs.order = 0;
        let child_len = child_nbs.length;

        self.renumber_children(parent, index);
        let new_len = if now_leaf { 1 } else { parent_len - child_len };
        self.set_length(parent, new_len);

        Ok(child)
    }

    /// Detaches the node from its parent and returns the former parent.
    ///
    /// Tree structure under the given node will be preserved.
    /// The detached node will become a root node.
    ///
    /// ```text
    /// Before `detach(1)`:
    ///
    /// root
    /// |-- 0
    /// |-- 1
    /// |   |-- 1-0
    /// |   `-- 1-1
    /// `-- 2
    ///
    /// After:
    ///
    /// root
    /// |-- 0
    /// `-- 2
    ///
    /// 1
    /// |-- 1-0
    /// `-- 1-1
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::NoParent`] if the node is a root.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub(crate) fn detach(&mut self, node: NodeId) -> Result<NodeId, StructureError> {
        let nbs = self
            .neighbors(node)
            .expect("[precondition] the node must be alive");
        let parent = nbs.parent.ok_or(StructureError::NoParent)?;
        let order = nbs.order;
        let detached = self.delete_child(parent, order)?;
        debug_assert_eq!(
            detached, node,
            "[consistency] `order` must be the index in the parent"
        );

        Ok(parent)
    }

    /// Detaches the node if necessary, and removes the node and all of its
    /// descendants.
    ///
    /// Returns the removed nodes in postorder.
    ///
    /// # Panics
    ///
    /// Panics if the node is not alive.
    pub(crate) fn remove_subtree(&mut self, node: NodeId) -> Vec<NodeId> {
        // Ignore `NoParent`: a root is already detached.
        let _ = self.detach(node);

        let mut removed = Vec::new();
        let mut traverser = DepthFirstTraverser::with_toplevel(node);
        while let Some(ev) = traverser.next(self) {
            if let DftEvent::Close(id) = ev {
                removed.push(id);
            }
        }
        for &id in &removed {
            self.neighbors_mut(id)
                .expect("[consistency] nodes in the subtree must be alive")
                .make_removed();
        }

        removed
    }
}

/// Neighbors and bookkeeping of a node.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Neighbors {
    /// Parent.
    parent: Option<NodeId>,
    /// Index of the node in the children of the parent.
    ///
    /// Always 0 for a root.
    order: usize,
    /// Children, in order.
    children: Vec<NodeId>,
    /// Number of leaves under the node.
    ///
    /// 1 for a leaf. 0 if the node has been removed.
    length: usize,
}

impl Neighbors {
    /// Creates a new `Neighbors` that is not connected to anyone.
    #[inline]
    #[must_use]
    fn new_root() -> Self {
        Self {
            parent: None,
            order: 0,
            children: Vec::new(),
            length: 1,
        }
    }

    /// Returns true if the node is alive.
    #[inline]
    #[must_use]
    fn is_alive(&self) -> bool {
        self.length != 0
    }

    /// Returns the node ID of the parent.
    #[inline]
    #[must_use]
    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the index of the node among its siblings.
    #[inline]
    #[must_use]
    pub(crate) fn order(&self) -> usize {
        self.order
    }

    /// Returns the children.
    #[inline]
    #[must_use]
    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the number of leaves under the node.
    #[inline]
    #[must_use]
    pub(crate) fn length(&self) -> usize {
        self.length
    }

    /// Returns true if the node has no children.
    #[inline]
    #[must_use]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the node ID of the next sibling.
    #[must_use]
    pub(crate) fn next_sibling(&self, hier: &Hierarchy) -> Option<NodeId> {
        let parent = hier
            .neighbors(self.parent?)
            .expect("[consistency] the parent of a live node must be alive");
        parent.children.get(self.order + 1).copied()
    }

    /// Returns the node ID of the previous sibling.
    #[must_use]
    pub(crate) fn prev_sibling(&self, hier: &Hierarchy) -> Option<NodeId> {
        let parent = hier
            .neighbors(self.parent?)
            .expect("[consistency] the parent of a live node must be alive");
        let prev = self.order.checked_sub(1)?;
        parent.children.get(prev).copied()
    }

    /// Makes the node removed state.
    ///
    /// It is caller's responsibility to remove the whole subtree at once and
    /// to detach it beforehand.
    fn make_removed(&mut self) {
        self.parent = None;
        self.order = 0;
        self.children = Vec::new();
        self.length = 0;
    }
}

// For compact printing.
impl fmt::Debug for Neighbors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neighbors")
            .field("parent", &self.parent)
            .field("order", &self.order)
            .field("children", &self.children)
            .field("length", &self.length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Checks parent, order, and length of every live node.
    fn assert_consistent(hier: &Hierarchy) {
        for (index, nbs) in hier.neighbors.iter().enumerate() {
            if !nbs.is_alive() {
                continue;
            }
            let id = NodeId::from_usize(index).expect("should never fail: valid index");
            let mut sum = 0;
            for (order, &child) in nbs.children.iter().enumerate() {
                let child_nbs = hier.neighbors(child).expect("child must be alive");
                assert_eq!(child_nbs.parent, Some(id));
                assert_eq!(child_nbs.order, order);
                sum += child_nbs.length;
            }
            let expected = if nbs.is_leaf() { 1 } else { sum };
            assert_eq!(nbs.length, expected, "length of {:?}", id);
        }
    }

    #[test]
    fn create_with_children() {
        let mut hier = Hierarchy::default();
        let a = hier.create_root();
        let b = hier.create_root();
        let parent = hier
            .create_with_children(&[a, b])
            .expect("should succeed");
        assert_eq!(hier.neighbors(parent).map(Neighbors::length), Some(2));
        assert_consistent(&hier);

        assert_eq!(
            hier.create_with_children(&[a]),
            Err(StructureError::AlreadyAttached)
        );
        let c = hier.create_root();
        assert_eq!(
            hier.create_with_children(&[c, c]),
            Err(StructureError::AlreadyAttached)
        );
        assert_consistent(&hier);
    }

    #[test]
    fn length_propagates_to_ancestors() {
        let mut hier = Hierarchy::default();
        let leaf = hier.create_root();
        let mid = hier.create_with_children(&[leaf]).expect("should succeed");
        let root = hier.create_with_children(&[mid]).expect("should succeed");

        let extra = hier.create_root();
        let extra_parent = hier.create_with_children(&[extra]).expect("should succeed");
        let extra2 = hier.create_root();
        hier.insert_child(extra_parent, 1, extra2)
            .expect("should succeed");
        hier.insert_child(mid, 0, extra_parent)
            .expect("should succeed");
        assert_eq!(hier.neighbors(root).map(Neighbors::length), Some(3));
        assert_consistent(&hier);

        hier.delete_child(mid, 1).expect("should succeed");
        assert_eq!(hier.neighbors(root).map(Neighbors::length), Some(2));
        assert_consistent(&hier);
    }

    #[test]
    fn leaf_turning_internal() {
        let mut hier = Hierarchy::default();
        let parent = hier.create_root();
        let a = hier.create_root();
        let b = hier.create_root();
        let child = hier.create_with_children(&[a, b]).expect("should succeed");
        hier.insert_child(parent, 0, child).expect("should succeed");
        assert_eq!(hier.neighbors(parent).map(Neighbors::length), Some(2));

        hier.delete_child(parent, 0).expect("should succeed");
        assert_eq!(hier.neighbors(parent).map(Neighbors::length), Some(1));
        assert_consistent(&hier);
    }

    #[test]
    fn loops_are_rejected() {
        let mut hier = Hierarchy::default();
        let leaf = hier.create_root();
        let root = hier.create_with_children(&[leaf]).expect("should succeed");
        assert_eq!(
            hier.insert_child(leaf, 0, root),
            Err(StructureError::AncestorDescendantLoop)
        );
        assert_eq!(
            hier.insert_child(root, 0, root),
            Err(StructureError::AncestorDescendantLoop)
        );
        assert_consistent(&hier);
    }

    #[test]
    fn remove_subtree() {
        let mut hier = Hierarchy::default();
        let a = hier.create_root();
        let b = hier.create_root();
        let mid = hier.create_with_children(&[a, b]).expect("should succeed");
        let c = hier.create_root();
        let root = hier.create_with_children(&[mid, c]).expect("should succeed");

        assert_eq!(hier.remove_subtree(mid), [a, b, mid]);
        assert!(!hier.is_alive(a));
        assert!(!hier.is_alive(mid));
        assert!(hier.is_alive(c));
        assert_eq!(hier.neighbors(root).map(Neighbors::children), Some(&[c][..]));
        assert_consistent(&hier);
    }
}
