//! In-memory model of a captured directory listing.
//!
//! The tree is built once from the textual output of a recursive long
//! listing and is read-only afterwards. Nodes are stored in an arena and
//! addressed through [`NodeId`] handles.

mod listing;
mod tree;

pub use listing::ListingError;
pub use tree::{Node, NodeId, NodeKind, NodeType, PathError, Tree};
