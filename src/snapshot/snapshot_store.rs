use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use snafu::ResultExt;
use tracing::{debug, info};

use super::error::{InconsistentTreeSnafu, WriteSnafu};
use crate::ext::PathDisplayExt;
use crate::snapshot::{FolderRecord, SnapshotError};
use crate::tree::FolderTree;

/// Reads and overwrites the snapshot document at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    root_name: String,
}

impl SnapshotStore {
    /// `root_name` names the root of a fresh tree, and of a stored tree
    /// whose root has no name.
    pub fn new(path: impl Into<PathBuf>, root_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            root_name: root_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restores the stored tree. A missing document is a fresh start.
    pub async fn load(&self) -> Result<FolderTree, SnapshotError> {
        debug!("Reading snapshot from {}", self.path.best_effort_display());
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No existing snapshot found, starting with an empty '{}'", self.root_name);
                return Ok(FolderTree::new(self.root_name.as_str()));
            }
            Err(source) => {
                return Err(SnapshotError::ReadError {
                    file_path: self.path.best_effort_display(),
                    source,
                });
            }
        };

        let tree = FolderRecord::from_json(&bytes)?
            .into_tree(&self.root_name)
            .context(InconsistentTreeSnafu)?;
        debug!("Restored snapshot with {} nodes", tree.node_count());
        Ok(tree)
    }

    /// Overwrites the document with the whole of `tree`.
    pub async fn save(&self, tree: &FolderTree) -> Result<(), SnapshotError> {
        let json = FolderRecord::try_from(tree)?.to_json()?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.context(WriteSnafu {
                file_path: parent.best_effort_display(),
            })?;
        }

        let written = fs::write(&self.path, json.into_bytes()).await;
        written.0.context(WriteSnafu {
            file_path: self.path.best_effort_display(),
        })?;
        debug!(
            "Wrote snapshot of {} nodes to {}",
            tree.node_count(),
            self.path.best_effort_display()
        );
        Ok(())
    }
}
