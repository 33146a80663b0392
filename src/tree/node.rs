use derive_more::{Display, IsVariant};
use hashlink::LinkedHashMap;

/// Handle to a node inside a [`FolderTree`](super::FolderTree).
///
/// Handles are only meaningful for the tree that issued them. A handle to a
/// removed node stays invalid for the rest of the tree's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct NodeId(pub(super) usize);

/// The two kinds of entries a folder can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryKind {
    #[display("file")]
    File,
    #[display("folder")]
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum NodeKind {
    File {
        content: String,
    },
    /// Children keyed by their current name, in insertion order.
    Folder {
        items: LinkedHashMap<String, NodeId>,
    },
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(super) name: String,
    pub(super) parent: Option<NodeId>,
    pub(super) kind: NodeKind,
}

impl Node {
    pub(super) fn file(name: String, content: String, parent: NodeId) -> Self {
        Self {
            name,
            parent: Some(parent),
            kind: NodeKind::File { content },
        }
    }

    pub(super) fn folder(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            parent,
            kind: NodeKind::Folder {
                items: LinkedHashMap::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The folder holding this node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn entry_kind(&self) -> EntryKind {
        match self.kind {
            NodeKind::File { .. } => EntryKind::File,
            NodeKind::Folder { .. } => EntryKind::Folder,
        }
    }

    pub fn items(&self) -> Option<&LinkedHashMap<String, NodeId>> {
        match &self.kind {
            NodeKind::Folder { items } => Some(items),
            NodeKind::File { .. } => None,
        }
    }

    pub(super) fn items_mut(&mut self) -> Option<&mut LinkedHashMap<String, NodeId>> {
        match &mut self.kind {
            NodeKind::Folder { items } => Some(items),
            NodeKind::File { .. } => None,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content } => Some(content),
            NodeKind::Folder { .. } => None,
        }
    }
}
