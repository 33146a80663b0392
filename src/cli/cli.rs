use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Interactive folder tree kept in a JSON snapshot between sessions.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Directory holding foldertree.yaml; relative snapshot paths resolve against it
    #[clap(long, short, default_value = ".")]
    pub root: PathBuf,

    /// Snapshot file to load and save, overriding the settings file
    #[clap(long, short)]
    pub data_file: Option<PathBuf>,

    /// Never colorize output
    #[clap(long)]
    pub no_color: bool,
}
