use snafu::Snafu;

use crate::tree::TreeError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(super)))]
pub enum SnapshotError {
    #[snafu(display("Failed to read the snapshot file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write the snapshot file: {}", file_path))]
    WriteError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Snapshot does not describe a folder tree"))]
    CorruptData { source: serde_json::Error },
    #[snafu(display("Failed to encode the folder tree"))]
    EncodeError { source: serde_json::Error },
    #[snafu(display("Snapshot and folder tree disagree"))]
    InconsistentTree { source: TreeError },
}
