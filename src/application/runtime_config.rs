use std::path::PathBuf;

use crate::cli::Cli;
use crate::config::Settings;

/// Effective configuration: command line over settings file over defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub data_file: PathBuf,
    pub root_name: String,
    pub color: bool,
    pub show_menu: bool,
}

impl RuntimeConfig {
    /// `terminal_supports_color` is only consulted when neither the command
    /// line nor the settings decide.
    pub fn resolve(cli: &Cli, settings: Settings, terminal_supports_color: bool) -> Self {
        let data_file = cli.data_file.clone().unwrap_or(settings.data_file);
        let color = !cli.no_color && settings.color.unwrap_or(terminal_supports_color);

        Self {
            data_file: cli.root.join(data_file),
            root_name: settings.root_name,
            color,
            show_menu: settings.show_menu,
        }
    }
}
