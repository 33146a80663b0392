use std::collections::HashMap;

use hashlink::LinkedHashMap;
use serde::{Deserialize, Deserializer, Serialize, de};
use snafu::ResultExt;
use tracing::debug;

use super::error::{CorruptDataSnafu, EncodeSnafu, InconsistentTreeSnafu};
use crate::snapshot::SnapshotError;
use crate::tree::{FolderTree, Node, NodeId, NodeKind, TreeError};

/// Serialized form of one folder and everything below it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRecord {
    #[serde(default)]
    pub name: String,
    pub items: LinkedHashMap<String, EntryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(default)]
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryRecord {
    Folder(FolderRecord),
    File(FileRecord),
}

/// Any object an entry may be read from. `items` decides the kind, so a
/// malformed folder is reported instead of being retried as a file.
#[derive(Deserialize)]
struct RawEntry {
    #[serde(default)]
    name: String,
    items: Option<LinkedHashMap<String, EntryRecord>>,
    content: Option<String>,
}

impl<'de> Deserialize<'de> for EntryRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let RawEntry {
            name,
            items,
            content,
        } = RawEntry::deserialize(deserializer)?;

        match (items, content) {
            (Some(items), _) => Ok(EntryRecord::Folder(FolderRecord { name, items })),
            (None, Some(content)) => Ok(EntryRecord::File(FileRecord { name, content })),
            (None, None) => Err(de::Error::custom(format!(
                "entry \"{name}\" has neither \"items\" nor \"content\""
            ))),
        }
    }
}

impl FolderRecord {
    /// Nesting depth is unbounded; the stack grows on demand while reading.
    pub fn from_json(json: impl AsRef<[u8]>) -> Result<Self, SnapshotError> {
        let mut deserializer = serde_json::Deserializer::from_slice(json.as_ref());
        deserializer.disable_recursion_limit();

        let record = Self::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
            .context(CorruptDataSnafu)?;
        deserializer.end().context(CorruptDataSnafu)?;
        Ok(record)
    }

    /// Pretty printed with two-space indentation.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).context(EncodeSnafu)
    }

    /// Captures `folder` and its subtree.
    pub fn capture(tree: &FolderTree, folder: NodeId) -> Result<Self, TreeError> {
        // Breadth-first, so walking the list backwards meets every folder
        // after all of its subfolders.
        let mut folders = vec![folder];
        let mut index = 0;
        while let Some(&current) = folders.get(index) {
            for (_, child) in tree.items(current)? {
                if tree.get(child).is_some_and(|node| node.kind().is_folder()) {
                    folders.push(child);
                }
            }
            index += 1;
        }

        let mut captured: HashMap<NodeId, FolderRecord> = HashMap::new();
        for &current in folders.iter().rev() {
            let mut items = LinkedHashMap::new();
            for (name, child) in tree.items(current)? {
                let entry = match tree.get(child).map(Node::kind) {
                    Some(NodeKind::File { content }) => EntryRecord::File(FileRecord {
                        name: name.to_string(),
                        content: content.clone(),
                    }),
                    Some(NodeKind::Folder { .. }) => match captured.remove(&child) {
                        Some(record) => EntryRecord::Folder(record),
                        None => continue,
                    },
                    None => continue,
                };
                items.insert(name.to_string(), entry);
            }
            captured.insert(
                current,
                FolderRecord {
                    name: tree.name(current).unwrap_or_default().to_string(),
                    items,
                },
            );
        }

        Ok(captured.remove(&folder).unwrap_or_default())
    }

    /// Rebuilds a tree rooted at this record. Children are named after
    /// their key; a nameless root is called `fallback_root_name`.
    pub fn into_tree(self, fallback_root_name: &str) -> Result<FolderTree, TreeError> {
        let root_name = if self.name.is_empty() {
            fallback_root_name.to_string()
        } else {
            self.name
        };

        let mut tree = FolderTree::new(root_name);
        let root = tree.root();
        attach_items(&mut tree, root, self.items)?;
        Ok(tree)
    }
}

fn attach_items(
    tree: &mut FolderTree,
    root: NodeId,
    items: LinkedHashMap<String, EntryRecord>,
) -> Result<(), TreeError> {
    let mut pending = vec![(root, items)];
    while let Some((folder, items)) = pending.pop() {
        for (key, entry) in items {
            match entry {
                EntryRecord::File(file) => {
                    if !file.name.is_empty() && file.name != key {
                        debug!("File stored as '{}' carries name '{}', using the key", key, file.name);
                    }
                    tree.add_file(folder, key, file.content)?;
                }
                EntryRecord::Folder(sub) => {
                    let child = tree.add_folder(folder, key)?;
                    pending.push((child, sub.items));
                }
            }
        }
    }
    Ok(())
}

impl TryFrom<&FolderTree> for FolderRecord {
    type Error = SnapshotError;

    fn try_from(tree: &FolderTree) -> Result<Self, Self::Error> {
        Self::capture(tree, tree.root()).context(InconsistentTreeSnafu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn round_trip(tree: &FolderTree) -> FolderTree {
        let json = FolderRecord::try_from(tree).unwrap().to_json().unwrap();
        FolderRecord::from_json(&json)
            .unwrap()
            .into_tree("root")
            .unwrap()
    }

    #[test]
    fn empty_root_round_trips() {
        let tree = FolderTree::new("root");
        assert_eq!(round_trip(&tree), tree);
    }

    #[test]
    fn single_file_round_trips() {
        let mut tree = FolderTree::new("root");
        let root = tree.root();
        tree.add_file(root, "hello.txt", "hello world").unwrap();

        let restored = round_trip(&tree);

        assert_eq!(restored, tree);
        assert_eq!(restored.read_file(restored.root(), "hello.txt"), Ok("hello world"));
    }

    #[test]
    fn three_levels_of_mixed_entries_round_trip() {
        let mut tree = FolderTree::new("root");
        let root = tree.root();
        let a = tree.add_folder(root, "a").unwrap();
        tree.add_file(root, "top.txt", "top").unwrap();
        let b = tree.add_folder(a, "b").unwrap();
        tree.add_file(a, "mid.txt", "").unwrap();
        let c = tree.add_folder(b, "c").unwrap();
        tree.add_file(b, "low.txt", "multi\nline \"quoted\"").unwrap();
        tree.add_file(c, "deepest.txt", "äöü🚀").unwrap();

        let restored = round_trip(&tree);

        assert_eq!(restored, tree);
        let deepest = restored.search(restored.root(), "deepest.txt").unwrap();
        assert_eq!(
            restored.path_of(deepest),
            Some("/root/a/b/c/deepest.txt".to_string())
        );
        let c = restored.search(restored.root(), "c").unwrap();
        let b = restored.get(c).unwrap().parent().unwrap();
        assert_eq!(restored.name(b), Some("b"));
    }

    #[test]
    fn serialized_shape_matches_document_layout() {
        let mut tree = FolderTree::new("root");
        let root = tree.root();
        let docs = tree.add_folder(root, "docs").unwrap();
        tree.add_file(docs, "a.txt", "alpha").unwrap();

        let value = serde_json::to_value(FolderRecord::try_from(&tree).unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "name": "root",
                "items": {
                    "docs": {
                        "name": "docs",
                        "items": {
                            "a.txt": { "name": "a.txt", "content": "alpha" }
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn json_is_indented_with_two_spaces() {
        let tree = FolderTree::new("root");
        let json = FolderRecord::try_from(&tree).unwrap().to_json().unwrap();
        assert_eq!(json, "{\n  \"name\": \"root\",\n  \"items\": {}\n}");
    }

    #[test]
    fn items_key_makes_an_entry_a_folder() {
        let json = r#"{"name":"root","items":{"box":{"name":"box","items":{},"content":"ignored"}}}"#;
        let tree = FolderRecord::from_json(json).unwrap().into_tree("root").unwrap();

        let id = tree.lookup(tree.root(), "box").unwrap().unwrap();
        assert!(tree.get(id).unwrap().kind().is_folder());
    }

    #[test]
    fn children_are_named_after_their_key() {
        let json = r#"{"name":"root","items":{"a.txt":{"name":"b.txt","content":"x"}}}"#;
        let tree = FolderRecord::from_json(json).unwrap().into_tree("root").unwrap();

        assert_eq!(tree.read_file(tree.root(), "a.txt"), Ok("x"));
        assert!(tree.lookup(tree.root(), "b.txt").unwrap().is_none());
    }

    #[test]
    fn nameless_root_uses_fallback_name() {
        let tree = FolderRecord::from_json(r#"{"items":{}}"#)
            .unwrap()
            .into_tree("home")
            .unwrap();
        assert_eq!(tree.name(tree.root()), Some("home"));
    }

    #[test]
    fn deeply_nested_document_is_read() {
        let depth = 500;
        let mut json = String::new();
        for level in 0..depth {
            json.push_str(&format!("{{\"name\":\"f{level}\",\"items\":{{\"f{}\":", level + 1));
        }
        json.push_str("{\"content\":\"bottom\"}");
        for _ in 0..depth {
            json.push_str("}}");
        }

        let tree = FolderRecord::from_json(&json)
            .expect("deep nesting is valid")
            .into_tree("root")
            .unwrap();

        assert_eq!(tree.node_count(), depth + 1);
        let bottom = tree.search(tree.root(), &format!("f{depth}")).unwrap();
        assert!(tree.get(bottom).unwrap().kind().is_file());
    }

    #[test]
    fn trailing_garbage_is_corrupt() {
        let result = FolderRecord::from_json(r#"{"name":"root","items":{}} extra"#);
        assert!(matches!(result, Err(SnapshotError::CorruptData { .. })));
    }

    #[rstest]
    #[case::not_json("{")]
    #[case::array("[]")]
    #[case::string("\"root\"")]
    #[case::top_level_file(r#"{"name":"root","content":"x"}"#)]
    #[case::items_not_a_map(r#"{"name":"root","items":5}"#)]
    #[case::shapeless_entry(r#"{"name":"root","items":{"a":{}}}"#)]
    #[case::name_only_entry(r#"{"name":"root","items":{"a":{"name":"a"}}}"#)]
    #[case::bad_nested_items(r#"{"name":"root","items":{"a":{"items":[],"content":"x"}}}"#)]
    #[case::content_not_a_string(r#"{"name":"root","items":{"a":{"content":3}}}"#)]
    fn unrecognizable_shapes_are_corrupt(#[case] json: &str) {
        let result = FolderRecord::from_json(json);
        assert!(
            matches!(result, Err(SnapshotError::CorruptData { .. })),
            "expected corrupt data for {json}, got {result:?}"
        );
    }
}
