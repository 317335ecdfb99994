//! Node ID.

use core::fmt;
use core::num::NonZeroUsize;

/// Node ID.
///
/// An index into the arena of a [`Forest`][`crate::Forest`]. IDs are never
/// reused inside a forest, so an ID of a removed node never aliases another
/// node.
///
/// The ordering (`PartialOrd` and `Ord`) for node IDs is only provided for
/// use with containers who want ordered key types (such as `BTreeSet`).
/// Users must use `Debug` formatting only for dumping the value, but not for
/// extracting the internal integer.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(NonZeroUsize);

impl NodeId {
    /// Creates a node ID from the arena index.
    ///
    /// Returns `None` if the given index is too large.
    #[inline]
    #[must_use]
    pub(crate) fn from_usize(index: usize) -> Option<Self> {
        index.checked_add(1).and_then(NonZeroUsize::new).map(Self)
    }

    /// Returns the arena index.
    #[inline]
    #[must_use]
    pub(crate) const fn get(self) -> usize {
        self.0.get() - 1
    }
}

// Prevent `{:#?}` from printing the value in redundant 3 lines.
impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use core::mem;

    #[test]
    fn niche_optimized() {
        assert_eq!(
            mem::size_of::<NodeId>(),
            mem::size_of::<Option<NodeId>>(),
            "`Option<NodeId>` type must have the same size as \
             `NodeId` type due to niche optimization"
        );
    }

    #[test]
    fn index_roundtrip() {
        let id = NodeId::from_usize(41).expect("should never fail: small index");
        assert_eq!(id.get(), 41);
        assert_eq!(format!("{:?}", id), "NodeId(41)");
        assert!(NodeId::from_usize(usize::MAX).is_none());
    }
}
