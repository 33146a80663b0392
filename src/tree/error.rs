use snafu::Snafu;

use crate::tree::{EntryKind, NodeId};

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(super)))]
pub enum TreeError {
    #[snafu(display("A file or folder named \"{}\" already exists in \"{}\"", name, folder))]
    NameConflict { name: String, folder: String },
    #[snafu(display("No {} named \"{}\" in \"{}\"", what, name, folder))]
    NotFound {
        what: String,
        name: String,
        folder: String,
    },
    #[snafu(display("\"{}\" is a {}, expected a {}", name, found, expected))]
    WrongKind {
        name: String,
        expected: EntryKind,
        found: EntryKind,
    },
    #[snafu(display("\"{}\" cannot be used as a file or folder name", name))]
    InvalidName { name: String },
    #[snafu(display("Node {} is not a live folder of this tree", id))]
    UnknownNode { id: NodeId },
}
