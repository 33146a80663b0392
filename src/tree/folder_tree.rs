use hashlink::LinkedHashMap;
use snafu::{OptionExt, ensure};
use tracing::debug;

use super::error::{
    InvalidNameSnafu, NameConflictSnafu, NotFoundSnafu, UnknownNodeSnafu, WrongKindSnafu,
};
use super::navigation::{PARENT_TARGET, SEPARATOR};
use crate::tree::{EntryKind, Node, NodeId, NodeKind, TreeError};

const ANY_ITEM: &str = "item";
const CURRENT_FOLDER: &str = ".";

/// Path syntax and the empty string cannot name an entry.
fn is_usable_name(name: &str) -> bool {
    !name.is_empty()
        && name != CURRENT_FOLDER
        && name != PARENT_TARGET
        && !name.contains(SEPARATOR)
}

/// Arena holding every node of one folder hierarchy.
///
/// Slot 0 is always the root folder. Removed nodes leave an empty slot
/// behind, so a handle can never start pointing at a different node.
#[derive(Debug, Clone)]
pub struct FolderTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl FolderTree {
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Some(Node::folder(root_name.into(), None))],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(Node::name)
    }

    fn folder_items(&self, folder: NodeId) -> Result<&LinkedHashMap<String, NodeId>, TreeError> {
        self.get(folder)
            .and_then(Node::items)
            .context(UnknownNodeSnafu { id: folder })
    }

    fn folder_items_mut(
        &mut self,
        folder: NodeId,
    ) -> Result<&mut LinkedHashMap<String, NodeId>, TreeError> {
        self.get_mut(folder)
            .and_then(Node::items_mut)
            .context(UnknownNodeSnafu { id: folder })
    }

    fn folder_label(&self, folder: NodeId) -> String {
        self.name(folder).unwrap_or_default().to_string()
    }

    /// Children of `folder` as `(name, handle)` pairs in insertion order.
    pub fn items(
        &self,
        folder: NodeId,
    ) -> Result<impl Iterator<Item = (&str, NodeId)>, TreeError> {
        Ok(self
            .folder_items(folder)?
            .iter()
            .map(|(name, &id)| (name.as_str(), id)))
    }

    pub fn item_count(&self, folder: NodeId) -> Result<usize, TreeError> {
        Ok(self.folder_items(folder)?.len())
    }

    /// Direct child of `folder` called `name`, if any.
    pub fn lookup(&self, folder: NodeId, name: &str) -> Result<Option<NodeId>, TreeError> {
        Ok(self.folder_items(folder)?.get(name).copied())
    }

    pub fn add_file(
        &mut self,
        folder: NodeId,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let node = Node::file(name.into(), content.into(), folder);
        self.insert_child(folder, node)
    }

    pub fn add_folder(
        &mut self,
        folder: NodeId,
        name: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        let node = Node::folder(name.into(), Some(folder));
        self.insert_child(folder, node)
    }

    fn insert_child(&mut self, folder: NodeId, node: Node) -> Result<NodeId, TreeError> {
        let items = self.folder_items(folder)?;
        ensure!(
            is_usable_name(&node.name),
            InvalidNameSnafu {
                name: node.name.clone(),
            }
        );
        ensure!(
            !items.contains_key(&node.name),
            NameConflictSnafu {
                name: node.name.clone(),
                folder: self.folder_label(folder),
            }
        );

        let id = NodeId(self.nodes.len());
        let name = node.name.clone();
        debug!(
            "Adding {} '{}' to folder {} as {}",
            node.entry_kind(),
            name,
            folder,
            id
        );
        self.nodes.push(Some(node));
        self.folder_items_mut(folder)?.insert(name, id);
        Ok(id)
    }

    /// Removes `name` from `folder` together with everything below it.
    ///
    /// Returns how many nodes were discarded.
    pub fn remove_item(&mut self, folder: NodeId, name: &str) -> Result<usize, TreeError> {
        let label = self.folder_label(folder);
        let removed = self
            .folder_items_mut(folder)?
            .remove(name)
            .context(NotFoundSnafu {
                what: ANY_ITEM,
                name,
                folder: label,
            })?;

        let discarded = self.discard_subtree(removed);
        debug!("Removed '{}' from folder {} ({} nodes)", name, folder, discarded);
        Ok(discarded)
    }

    fn discard_subtree(&mut self, top: NodeId) -> usize {
        let mut pending = vec![top];
        let mut discarded = 0;

        while let Some(id) = pending.pop() {
            let Some(node) = self.nodes.get_mut(id.0).and_then(|slot| slot.take()) else {
                continue;
            };
            discarded += 1;
            if let NodeKind::Folder { items } = node.kind {
                pending.extend(items.into_iter().map(|(_, child)| child));
            }
        }

        discarded
    }

    pub fn rename_folder(
        &mut self,
        folder: NodeId,
        old_name: &str,
        new_name: &str,
    ) -> Result<NodeId, TreeError> {
        self.rename_entry(folder, old_name, new_name, EntryKind::Folder)
    }

    pub fn rename_file(
        &mut self,
        folder: NodeId,
        old_name: &str,
        new_name: &str,
    ) -> Result<NodeId, TreeError> {
        self.rename_entry(folder, old_name, new_name, EntryKind::File)
    }

    /// Renames a direct child of `folder`. The child must be of kind
    /// `expected`; a child of the other kind counts as missing.
    fn rename_entry(
        &mut self,
        folder: NodeId,
        old_name: &str,
        new_name: &str,
        expected: EntryKind,
    ) -> Result<NodeId, TreeError> {
        let label = self.folder_label(folder);
        let items = self.folder_items(folder)?;

        let id = items
            .get(old_name)
            .copied()
            .filter(|&id| self.get(id).map(Node::entry_kind) == Some(expected))
            .context(NotFoundSnafu {
                what: expected.to_string(),
                name: old_name,
                folder: label.clone(),
            })?;
        ensure!(is_usable_name(new_name), InvalidNameSnafu { name: new_name });
        ensure!(
            !items.contains_key(new_name),
            NameConflictSnafu {
                name: new_name,
                folder: label,
            }
        );

        let items = self.folder_items_mut(folder)?;
        items.remove(old_name);
        items.insert(new_name.to_string(), id);
        if let Some(node) = self.get_mut(id) {
            node.name = new_name.to_string();
        }

        debug!(
            "Renamed {} '{}' to '{}' in folder {}",
            expected, old_name, new_name, folder
        );
        Ok(id)
    }

    pub fn read_file(&self, folder: NodeId, name: &str) -> Result<&str, TreeError> {
        let id = self.lookup(folder, name)?.context(NotFoundSnafu {
            what: ANY_ITEM,
            name,
            folder: self.folder_label(folder),
        })?;
        let node = self.get(id).context(UnknownNodeSnafu { id })?;

        node.content().context(WrongKindSnafu {
            name,
            expected: EntryKind::File,
            found: node.entry_kind(),
        })
    }

    /// Depth-first search below `from`.
    ///
    /// Each folder checks its own items before descending into its
    /// subfolders, in insertion order. `from` itself is never a match.
    pub fn search(&self, from: NodeId, name: &str) -> Option<NodeId> {
        let mut pending = vec![from];
        while let Some(folder) = pending.pop() {
            let Some(items) = self.get(folder).and_then(Node::items) else {
                continue;
            };
            if let Some(&hit) = items.get(name) {
                return Some(hit);
            }
            pending.extend(items.values().rev().copied());
        }
        None
    }

    /// Absolute path of a node, e.g. `/root/docs/notes.txt`.
    pub fn path_of(&self, id: NodeId) -> Option<String> {
        let mut segments = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current)?;
            segments.push(node.name());
            cursor = node.parent();
        }

        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }
}

/// Trees are equal when their names, file contents and nesting match.
/// Handles and item order are not compared.
impl PartialEq for FolderTree {
    fn eq(&self, other: &Self) -> bool {
        same_subtree(self, self.root, other, other.root)
    }
}

impl Eq for FolderTree {}

fn same_subtree(left: &FolderTree, left_id: NodeId, right: &FolderTree, right_id: NodeId) -> bool {
    let mut pending = vec![(left_id, right_id)];
    while let Some((left_id, right_id)) = pending.pop() {
        let (Some(a), Some(b)) = (left.get(left_id), right.get(right_id)) else {
            return false;
        };
        if a.name != b.name {
            return false;
        }

        match (&a.kind, &b.kind) {
            (NodeKind::File { content: a }, NodeKind::File { content: b }) => {
                if a != b {
                    return false;
                }
            }
            (NodeKind::Folder { items: a }, NodeKind::Folder { items: b }) => {
                if a.len() != b.len() {
                    return false;
                }
                for (name, &child) in a {
                    match b.get(name) {
                        Some(&other) => pending.push((child, other)),
                        None => return false,
                    }
                }
            }
            _ => return false,
        }
    }
    true
}
