use std::fmt;

use snafu::OptionExt;

use super::error::UnknownNodeSnafu;
use crate::tree::{FolderTree, NodeId, NodeKind, TreeError};

const INDENT: &str = "  ";

/// Indented, read-only rendering of a folder and everything below it.
///
/// ```text
/// - root/
///   - docs/
///     - notes.txt
///   - readme.md
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    tree: &'a FolderTree,
    folder: NodeId,
}

impl FolderTree {
    pub fn listing(&self, folder: NodeId) -> Result<Listing<'_>, TreeError> {
        self.get(folder)
            .filter(|node| node.kind().is_folder())
            .context(UnknownNodeSnafu { id: folder })?;
        Ok(Listing { tree: self, folder })
    }
}

impl fmt::Display for Listing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self.folder, 0)];
        while let Some((id, depth)) = pending.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let indent = INDENT.repeat(depth);
            match node.kind() {
                NodeKind::File { .. } => writeln!(f, "{indent}- {}", node.name())?,
                NodeKind::Folder { items } => {
                    writeln!(f, "{indent}- {}/", node.name())?;
                    pending.extend(items.values().rev().map(|&child| (child, depth + 1)));
                }
            }
        }
        Ok(())
    }
}
