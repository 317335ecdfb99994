//! Errors.

use thiserror::Error;

/// Structure inconsistency error.
///
/// Returned by edits that would break the tree shape, and by queries given
/// an address or a pair of trees that do not fit the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Attempt to give a node a second parent.
    #[error("the node already has a parent")]
    AlreadyAttached,
    /// Attempt to make a node the ancestor of itself.
    #[error("attempt to make a node the ancestor of itself")]
    AncestorDescendantLoop,
    /// Attempt to detach a node that has no parent.
    #[error("the node has no parent")]
    NoParent,
    /// Child index beyond the number of children.
    #[error("child index {index} is out of range for a node with {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children of the node.
        len: usize,
    },
    /// Two trees expected to have the same shape do not.
    #[error("the trees do not have the same shape")]
    ShapeMismatch,
}

/// Malformed bracketed text.
///
/// Offsets are byte offsets into the parsed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text contains no tokens.
    #[error("no tree in the input")]
    Empty,
    /// The input ended inside an open node.
    #[error("unterminated node opened at byte {offset}")]
    Unterminated {
        /// Offset of the `(` of the innermost unclosed node.
        offset: usize,
    },
    /// A `)` without a matching `(`.
    #[error("unexpected `)` at byte {offset}")]
    UnexpectedClose {
        /// Offset of the `)`.
        offset: usize,
    },
    /// A node with neither a label nor children, i.e. `()`.
    #[error("empty node `()` at byte {offset}")]
    EmptyNode {
        /// Offset of the `(`.
        offset: usize,
    },
}
