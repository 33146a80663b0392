//! JSON snapshots of a whole [`FolderTree`](crate::tree::FolderTree).
//!
//! A folder is written as `{ "name": ..., "items": { ... } }` and a file as
//! `{ "name": ..., "content": ... }`. Reading classifies an entry by the
//! presence of `items`; parent handles are rebuilt from the nesting.

mod error;
mod record;
mod snapshot_store;

pub use error::SnapshotError;
pub use record::{EntryRecord, FileRecord, FolderRecord};
pub use snapshot_store::SnapshotStore;
