use snafu::prelude::*;
use tracing::{debug, info};

use crate::shell::{Command, MENU};
use crate::snapshot::{SnapshotError, SnapshotStore};
use crate::tree::{FolderTree, Navigation, NodeId, PathStack, TreeError};

/// What a command produced, for the console to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The tree changed, or the current folder did.
    Success(String),
    /// Informational; nothing changed.
    Notice(String),
    /// Read-only output such as a listing or file content.
    Output(String),
    Exit,
}

/// Façade state: the tree, where the user currently is, how they got
/// there, and where the tree is persisted.
#[derive(Debug)]
pub struct Session {
    tree: FolderTree,
    current: NodeId,
    path_stack: PathStack,
    store: SnapshotStore,
}

impl Session {
    pub fn new(tree: FolderTree, store: SnapshotStore) -> Self {
        let current = tree.root();
        Self {
            tree,
            current,
            path_stack: PathStack::new(),
            store,
        }
    }

    /// Starts a session on whatever the store holds.
    pub async fn open(store: SnapshotStore) -> Result<Self, SnapshotError> {
        let tree = store.load().await?;
        info!("Session opened with {} nodes", tree.node_count());
        Ok(Self::new(tree, store))
    }

    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn path_stack(&self) -> &PathStack {
        &self.path_stack
    }

    pub fn current_path(&self) -> String {
        self.tree.path_of(self.current).unwrap_or_default()
    }

    /// Runs `command`, then snapshots the whole tree if it changed.
    ///
    /// When the snapshot cannot be written the change stays in memory and
    /// the failure is returned.
    pub async fn execute(&mut self, command: Command) -> Result<Reply, SessionError> {
        let mutation = command.is_mutation();
        let reply = self.apply(command)?;

        if mutation {
            debug!("Persisting tree to {}", self.store.path().display());
            self.store.save(&self.tree).await.context(PersistSnafu)?;
        }
        Ok(reply)
    }

    fn apply(&mut self, command: Command) -> Result<Reply, TreeError> {
        let current = self.current;
        let reply = match command {
            Command::AddFile { name, content } => {
                self.tree.add_file(current, name.as_str(), content)?;
                Reply::Success(format!("File \"{name}\" added."))
            }
            Command::AddFolder { name } => {
                self.tree.add_folder(current, name.as_str())?;
                Reply::Success(format!("Folder \"{name}\" added."))
            }
            Command::RenameFolder { from, to } => {
                self.tree.rename_folder(current, &from, &to)?;
                Reply::Success(format!("Folder \"{from}\" renamed to \"{to}\"."))
            }
            Command::RenameFile { from, to } => {
                self.tree.rename_file(current, &from, &to)?;
                Reply::Success(format!("File \"{from}\" renamed to \"{to}\"."))
            }
            Command::Remove { name } => {
                let discarded = self.tree.remove_item(current, &name)?;
                match discarded {
                    1 => Reply::Success(format!("Item \"{name}\" removed.")),
                    n => Reply::Success(format!(
                        "Item \"{name}\" removed along with {} nested items.",
                        n - 1
                    )),
                }
            }
            Command::Display => {
                let listing = self.tree.listing(current)?;
                Reply::Output(format!(
                    "Current folder: {}\n{}",
                    self.folder_name(current),
                    listing
                ))
            }
            Command::Search { name } => match self.tree.search(self.tree.root(), &name) {
                Some(found) => Reply::Output(format!(
                    "Found: {} ({})",
                    name,
                    self.tree.path_of(found).unwrap_or_default()
                )),
                None => Reply::Notice(format!("\"{name}\" not found.")),
            },
            Command::ReadFile { name } => {
                Reply::Output(self.tree.read_file(current, &name)?.to_string())
            }
            Command::Navigate { target } => self.navigate(&target)?,
            Command::Pwd => Reply::Output(self.current_path()),
            Command::Help => Reply::Output(MENU.to_string()),
            Command::Exit => Reply::Exit,
        };
        Ok(reply)
    }

    fn navigate(&mut self, target: &str) -> Result<Reply, TreeError> {
        let outcome = self
            .tree
            .navigate(self.current, target, &mut self.path_stack)?;
        self.current = outcome.folder();

        let reply = match outcome {
            Navigation::Moved { to } => {
                Reply::Success(format!("Moved to folder \"{}\".", self.folder_name(to)))
            }
            Navigation::AlreadyAtRoot { .. } => {
                Reply::Notice("Already at the root folder.".to_string())
            }
            Navigation::Stopped { segment, .. } => {
                Reply::Notice(format!("Folder \"{segment}\" does not exist."))
            }
        };
        Ok(reply)
    }

    fn folder_name(&self, folder: NodeId) -> &str {
        self.tree.name(folder).unwrap_or_default()
    }
}

#[derive(Debug, Snafu)]
pub enum SessionError {
    #[snafu(transparent)]
    Tree { source: TreeError },
    #[snafu(display("The change was applied but the snapshot could not be saved"))]
    PersistError { source: SnapshotError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        session: Session,
        store: SnapshotStore,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store = SnapshotStore::new(dir.path().join("folderData.json"), "root");
        let session = Session::new(FolderTree::new("root"), store.clone());
        Fixture {
            _dir: dir,
            session,
            store,
        }
    }

    async fn run(session: &mut Session, line: &str) -> Result<Reply, SessionError> {
        session
            .execute(line.parse().expect("test commands should parse"))
            .await
    }

    #[compio::test]
    async fn mutations_are_persisted() {
        let Fixture {
            _dir,
            mut session,
            store,
        } = fixture();

        let reply = run(&mut session, "add-folder docs").await.unwrap();
        assert_eq!(reply, Reply::Success("Folder \"docs\" added.".to_string()));
        run(&mut session, "cd docs").await.unwrap();
        run(&mut session, "add-file todo.txt buy milk").await.unwrap();

        let stored = store.load().await.unwrap();
        assert_eq!(&stored, session.tree());
        let docs = stored.lookup(stored.root(), "docs").unwrap().unwrap();
        assert_eq!(stored.read_file(docs, "todo.txt"), Ok("buy milk"));
    }

    #[compio::test]
    async fn failed_mutation_leaves_tree_and_snapshot_alone() {
        let Fixture {
            _dir,
            mut session,
            store,
        } = fixture();
        run(&mut session, "add-file a.txt one").await.unwrap();
        let before = std::fs::read_to_string(store.path()).unwrap();

        let result = run(&mut session, "add-folder a.txt").await;

        assert!(matches!(
            result,
            Err(SessionError::Tree {
                source: TreeError::NameConflict { .. }
            })
        ));
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(session.tree().item_count(session.current()).unwrap(), 1);
    }

    #[compio::test]
    async fn read_only_commands_do_not_write_a_snapshot() {
        let Fixture {
            _dir,
            mut session,
            store,
        } = fixture();

        run(&mut session, "display").await.unwrap();
        run(&mut session, "search anything").await.unwrap();
        run(&mut session, "cd ..").await.unwrap();

        assert!(!store.path().exists());
    }

    #[compio::test]
    async fn display_lists_the_current_folder() {
        let Fixture { _dir, mut session, .. } = fixture();
        run(&mut session, "add-folder docs").await.unwrap();
        run(&mut session, "add-file readme.md hi").await.unwrap();

        let reply = run(&mut session, "display").await.unwrap();

        assert_eq!(
            reply,
            Reply::Output("Current folder: root\n- root/\n  - docs/\n  - readme.md\n".to_string())
        );
    }

    #[compio::test]
    async fn rename_then_search_follows_the_new_name() {
        let Fixture { _dir, mut session, .. } = fixture();
        run(&mut session, "add-folder a").await.unwrap();

        run(&mut session, "rename-folder a b").await.unwrap();

        assert_eq!(
            run(&mut session, "search a").await.unwrap(),
            Reply::Notice("\"a\" not found.".to_string())
        );
        assert_eq!(
            run(&mut session, "search b").await.unwrap(),
            Reply::Output("Found: b (/root/b)".to_string())
        );
    }

    #[compio::test]
    async fn search_always_starts_at_the_root() {
        let Fixture { _dir, mut session, .. } = fixture();
        run(&mut session, "add-file top.txt").await.unwrap();
        run(&mut session, "add-folder sub").await.unwrap();
        run(&mut session, "cd sub").await.unwrap();

        let reply = run(&mut session, "search top.txt").await.unwrap();

        assert_eq!(reply, Reply::Output("Found: top.txt (/root/top.txt)".to_string()));
    }

    #[compio::test]
    async fn navigation_failures_are_notices() {
        let Fixture { _dir, mut session, .. } = fixture();
        run(&mut session, "add-folder x").await.unwrap();
        run(&mut session, "cd x").await.unwrap();
        run(&mut session, "add-folder z").await.unwrap();
        run(&mut session, "cd ..").await.unwrap();

        let reply = run(&mut session, "cd x/y/z").await.unwrap();

        assert_eq!(reply, Reply::Notice("Folder \"y\" does not exist.".to_string()));
        assert_eq!(session.current_path(), "/root/x");
        assert_eq!(session.path_stack().as_slice(), &[session.tree().root()]);
    }

    #[compio::test]
    async fn path_syntax_names_are_refused_and_not_persisted() {
        let Fixture {
            _dir,
            mut session,
            store,
        } = fixture();

        let result = run(&mut session, "add-folder ..").await;

        assert!(matches!(
            result,
            Err(SessionError::Tree {
                source: TreeError::InvalidName { .. }
            })
        ));
        assert_eq!(session.tree().item_count(session.current()).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[compio::test]
    async fn parent_of_root_is_a_notice() {
        let Fixture { _dir, mut session, .. } = fixture();

        let reply = run(&mut session, "cd ..").await.unwrap();

        assert_eq!(reply, Reply::Notice("Already at the root folder.".to_string()));
        assert_eq!(session.current(), session.tree().root());
    }

    #[compio::test]
    async fn relative_commands_act_on_the_current_folder() {
        let Fixture { _dir, mut session, .. } = fixture();
        run(&mut session, "add-folder docs").await.unwrap();
        run(&mut session, "cd docs").await.unwrap();
        run(&mut session, "add-file notes.txt hello there").await.unwrap();

        assert_eq!(
            run(&mut session, "read-file notes.txt").await.unwrap(),
            Reply::Output("hello there".to_string())
        );
        assert_eq!(
            run(&mut session, "pwd").await.unwrap(),
            Reply::Output("/root/docs".to_string())
        );

        run(&mut session, "cd ..").await.unwrap();
        assert!(matches!(
            run(&mut session, "read-file notes.txt").await,
            Err(SessionError::Tree {
                source: TreeError::NotFound { .. }
            })
        ));
        assert!(matches!(
            run(&mut session, "read-file docs").await,
            Err(SessionError::Tree {
                source: TreeError::WrongKind { .. }
            })
        ));
    }

    #[compio::test]
    async fn removing_a_folder_reports_nested_items() {
        let Fixture { _dir, mut session, .. } = fixture();
        run(&mut session, "add-folder docs").await.unwrap();
        run(&mut session, "cd docs").await.unwrap();
        run(&mut session, "add-file a").await.unwrap();
        run(&mut session, "add-file b").await.unwrap();
        run(&mut session, "cd ..").await.unwrap();

        let reply = run(&mut session, "remove docs").await.unwrap();

        assert_eq!(
            reply,
            Reply::Success("Item \"docs\" removed along with 2 nested items.".to_string())
        );
        assert_eq!(session.tree().node_count(), 1);
    }

    #[compio::test]
    async fn unwritable_snapshot_keeps_the_change_in_memory() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let store = SnapshotStore::new(dir.path(), "root");
        let mut session = Session::new(FolderTree::new("root"), store);

        let result = run(&mut session, "add-file kept.txt still here").await;

        assert!(matches!(result, Err(SessionError::PersistError { .. })));
        let root = session.tree().root();
        assert_eq!(session.tree().read_file(root, "kept.txt"), Ok("still here"));
    }

    #[compio::test]
    async fn open_restores_the_stored_tree() {
        let Fixture {
            _dir,
            mut session,
            store,
        } = fixture();
        run(&mut session, "add-folder docs").await.unwrap();

        let reopened = Session::open(store).await.unwrap();

        assert_eq!(reopened.tree(), session.tree());
        assert_eq!(reopened.current(), reopened.tree().root());
    }

    #[compio::test]
    async fn exit_and_help() {
        let Fixture { _dir, mut session, .. } = fixture();

        assert_eq!(run(&mut session, "7").await.unwrap(), Reply::Exit);
        assert_eq!(
            run(&mut session, "help").await.unwrap(),
            Reply::Output(MENU.to_string())
        );
    }
}
