//! Labeled syntax trees stored in an arena.
//!
//! Nodes of any number of trees live in a [`Forest`] and are referred to by
//! [`NodeId`]. Every node knows its parent, its index among its siblings
//! ("order"), and the number of leaves under it ("length"). These values are
//! kept consistent by every structural edit on the forest.
//!
//! Trees can be read from and written to the bracketed text format used by
//! treebanks:
//!
//! ```
//! use synforest::Forest;
//!
//! let mut forest = Forest::<String>::new();
//! let root = forest
//!     .parse("(S (NP (DT the) (NN dog)) (VP (VBD barked)))")
//!     .expect("should never fail: the text is well-formed");
//!
//! let node = forest.node(root).expect("should never fail: node exists");
//! assert_eq!(node.length(), 3);
//! assert_eq!(node.yield_labels(), ["the", "dog", "barked"]);
//! assert_eq!(
//!     node.to_string(),
//!     "(S (NP (DT the) (NN dog)) (VP (VBD barked)))"
//! );
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod attr;
pub mod bracketed;
mod error;
pub mod forest;
mod hierarchy;
mod id;

pub use self::attr::{Missing, NodeMap};
pub use self::error::{ParseError, StructureError};
pub use self::forest::span::Span;
pub use self::forest::traverse::DftEvent;
pub use self::forest::{ChildPos, Forest, Node, TreeBuilder};
pub use self::id::NodeId;
