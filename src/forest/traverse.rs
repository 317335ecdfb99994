//! Tree traversal.
//!
//! Iterators here borrow the forest immutably, so the tree cannot be edited
//! while it is being traversed. All of them are cheap to clone, and a clone
//! restarts from the position of the original.

use core::iter;
use core::slice;

use crate::forest::{Forest, Node};
use crate::hierarchy::traverse::{
    AncestorsTraverser, DepthFirstTraverser, DftEvent as DftEventSrc,
};
use crate::id::NodeId;

/// Depth-first traversal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DftEvent<T> {
    /// Node open.
    Open(T),
    /// Node close.
    Close(T),
}

impl<T> DftEvent<T> {
    /// Converts the internal value.
    pub fn map<F, U>(self, f: F) -> DftEvent<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Open(v) => DftEvent::Open(f(v)),
            Self::Close(v) => DftEvent::Close(f(v)),
        }
    }

    /// Returns the internal value.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Open(v) | Self::Close(v) => v,
        }
    }
}

/// Double-ended iterator for depth-first traversal.
pub struct DepthFirstTraverse<'a, T> {
    /// Forest.
    forest: &'a Forest<T>,
    /// Traverser.
    traverser: DepthFirstTraverser,
}

impl<'a, T> DepthFirstTraverse<'a, T> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn with_toplevel(node: &Node<'a, T>) -> Self {
        Self {
            forest: node.forest(),
            traverser: DepthFirstTraverser::with_toplevel(node.id()),
        }
    }

    /// Converts a hierarchy event into an event of node proxies.
    #[must_use]
    fn convert(&self, ev: DftEventSrc) -> DftEvent<Node<'a, T>> {
        match ev {
            DftEventSrc::Open(id) => DftEvent::Open(Node::new_alive(self.forest, id)),
            DftEventSrc::Close(id) => DftEvent::Close(Node::new_alive(self.forest, id)),
        }
    }
}

impl<'a, T> Iterator for DepthFirstTraverse<'a, T> {
    type Item = DftEvent<Node<'a, T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let ev = self.traverser.next(self.forest.hierarchy())?;
        Some(self.convert(ev))
    }
}

impl<T> DoubleEndedIterator for DepthFirstTraverse<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let ev = self.traverser.next_back(self.forest.hierarchy())?;
        Some(self.convert(ev))
    }
}

impl<T> iter::FusedIterator for DepthFirstTraverse<'_, T> {}

// Manual impls, since derived ones would require `T: Clone`.
impl<T> Clone for DepthFirstTraverse<'_, T> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest,
            traverser: self.traverser,
        }
    }
}

/// Double-ended iterator visiting nodes before their children.
pub struct Preorder<'a, T> {
    /// Underlying traversal.
    inner: DepthFirstTraverse<'a, T>,
}

impl<'a, T> Preorder<'a, T> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn with_toplevel(node: &Node<'a, T>) -> Self {
        Self {
            inner: DepthFirstTraverse::with_toplevel(node),
        }
    }
}

impl<'a, T> Iterator for Preorder<'a, T> {
    type Item = Node<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|ev| match ev {
            DftEvent::Open(node) => Some(node),
            DftEvent::Close(_) => None,
        })
    }
}

impl<T> DoubleEndedIterator for Preorder<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.rfind(|ev| matches!(ev, DftEvent::Open(_))).map(DftEvent::into_inner)
    }
}

impl<T> iter::FusedIterator for Preorder<'_, T> {}

impl<T> Clone for Preorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Double-ended iterator visiting nodes after their children.
pub struct Postorder<'a, T> {
    /// Underlying traversal.
    inner: DepthFirstTraverse<'a, T>,
}

impl<'a, T> Postorder<'a, T> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn with_toplevel(node: &Node<'a, T>) -> Self {
        Self {
            inner: DepthFirstTraverse::with_toplevel(node),
        }
    }
}

impl<'a, T> Iterator for Postorder<'a, T> {
    type Item = Node<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|ev| match ev {
            DftEvent::Open(_) => None,
            DftEvent::Close(node) => Some(node),
        })
    }
}

impl<T> DoubleEndedIterator for Postorder<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.rfind(|ev| matches!(ev, DftEvent::Close(_))).map(DftEvent::into_inner)
    }
}

impl<T> iter::FusedIterator for Postorder<'_, T> {}

impl<T> Clone for Postorder<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Double-ended iterator of the leaves, from left to right.
pub struct Frontier<'a, T> {
    /// Underlying traversal.
    inner: Preorder<'a, T>,
}

impl<'a, T> Frontier<'a, T> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn with_toplevel(node: &Node<'a, T>) -> Self {
        Self {
            inner: Preorder::with_toplevel(node),
        }
    }
}

impl<'a, T> Iterator for Frontier<'a, T> {
    type Item = Node<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find(Node::is_leaf)
    }
}

impl<T> DoubleEndedIterator for Frontier<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.rfind(Node::is_leaf)
    }
}

impl<T> iter::FusedIterator for Frontier<'_, T> {}

impl<T> Clone for Frontier<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Ancestors iterator.
///
/// Note that this returns the starting node first.
pub struct Ancestors<'a, T> {
    /// Forest.
    forest: &'a Forest<T>,
    /// Traverser.
    traverser: AncestorsTraverser,
}

impl<'a, T> Ancestors<'a, T> {
    /// Creates a new iterator.
    #[inline]
    #[must_use]
    pub(super) fn with_start(node: &Node<'a, T>) -> Self {
        Self {
            forest: node.forest(),
            traverser: AncestorsTraverser::with_start(node.id()),
        }
    }
}

impl<'a, T> Iterator for Ancestors<'a, T> {
    type Item = Node<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.traverser.next(self.forest.hierarchy())?;
        Some(Node::new_alive(self.forest, id))
    }
}

impl<T> iter::FusedIterator for Ancestors<'_, T> {}

impl<T> Clone for Ancestors<'_, T> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest,
            traverser: self.traverser,
        }
    }
}

/// Double-ended iterator of the children.
pub struct Children<'a, T> {
    /// Forest.
    forest: &'a Forest<T>,
    /// Remaining children.
    ids: slice::Iter<'a, NodeId>,
}

impl<'a, T> Children<'a, T> {
    /// Creates a new iterator from a parent.
    #[inline]
    #[must_use]
    pub(super) fn with_parent(parent: &Node<'a, T>) -> Self {
        Self {
            forest: parent.forest(),
            ids: parent.children_ids().iter(),
        }
    }
}

impl<'a, T> Iterator for Children<'a, T> {
    type Item = Node<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next()?;
        Some(Node::new_alive(self.forest, id))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T> DoubleEndedIterator for Children<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next_back()?;
        Some(Node::new_alive(self.forest, id))
    }
}

impl<T> ExactSizeIterator for Children<'_, T> {}

impl<T> iter::FusedIterator for Children<'_, T> {}

impl<T> Clone for Children<'_, T> {
    fn clone(&self) -> Self {
        Self {
            forest: self.forest,
            ids: self.ids.clone(),
        }
    }
}

/// Iterator of the pairs of corresponding nodes of two trees with the same
/// shape, in postorder.
///
/// Created by [`Node::zip_postorder`], which checks the shapes beforehand.
pub struct ZipPostorder<'a, 'b, T, U> {
    /// Postorder of the left tree.
    lhs: Postorder<'a, T>,
    /// Postorder of the right tree.
    rhs: Postorder<'b, U>,
}

impl<'a, 'b, T, U> ZipPostorder<'a, 'b, T, U> {
    /// Creates a new iterator.
    ///
    /// It is caller's responsibility to ensure that the trees have the same shape.
    #[inline]
    #[must_use]
    pub(super) fn new(lhs: Postorder<'a, T>, rhs: Postorder<'b, U>) -> Self {
        Self { lhs, rhs }
    }
}

impl<'a, 'b, T, U> Iterator for ZipPostorder<'a, 'b, T, U> {
    type Item = (Node<'a, T>, Node<'b, U>);

    fn next(&mut self) -> Option<Self::Item> {
        match (self.lhs.next(), self.rhs.next()) {
            (Some(lhs), Some(rhs)) => Some((lhs, rhs)),
            (None, None) => None,
            _ => unreachable!("[consistency] the trees have been checked to have the same shape"),
        }
    }
}

impl<T, U> iter::FusedIterator for ZipPostorder<'_, '_, T, U> {}

impl<T, U> Clone for ZipPostorder<'_, '_, T, U> {
    fn clone(&self) -> Self {
        Self {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
        }
    }
}
