use std::io;

use snafu::prelude::*;
use supports_color::Stream;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::cli::Cli;
use crate::config::{Settings, SettingsError};
use crate::ext::PathDisplayExt;
use crate::shell::{Console, Session, Shell, ShellError};
use crate::snapshot::{SnapshotError, SnapshotStore};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let settings = Settings::read(&cli.root).await.context(SettingsSnafu)?;
        debug!("Loaded settings: {:?}", settings);

        let terminal_color = supports_color::on(Stream::Stdout).is_some();
        let config = RuntimeConfig::resolve(&cli, settings, terminal_color);
        debug!("Resolved runtime config: {:?}", config);
        colored::control::set_override(config.color);

        let store = SnapshotStore::new(&config.data_file, config.root_name.as_str());
        info!("Using snapshot {}", config.data_file.best_effort_display());
        let session = Session::open(store).await.context(SnapshotLoadSnafu)?;

        let mut shell = Shell::new(session, Console::new(io::stdout()), config.show_menu);
        shell.run(io::stdin().lock()).await.context(ShellSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while reading settings"))]
    SettingsError { source: SettingsError },
    #[snafu(display("Critical failure encountered while restoring the folder tree"))]
    SnapshotLoadError { source: SnapshotError },
    #[snafu(display("Critical failure encountered in the interactive shell"))]
    ShellError { source: ShellError },
}
