//! In-memory folder tree.
//!
//! Nodes live in an arena owned by [`FolderTree`] and are addressed by
//! [`NodeId`] handles. A folder maps child names to handles; every node
//! keeps a handle to the folder holding it, so the parent relation is a
//! lookup and never an ownership edge.

mod error;
mod folder_tree;
mod listing;
mod navigation;
mod node;

pub use error::TreeError;
pub use folder_tree::FolderTree;
pub use listing::Listing;
pub use navigation::{Navigation, PathStack};
pub use node::{EntryKind, Node, NodeId, NodeKind};
