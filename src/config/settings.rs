use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::ext::PathDisplayExt;

const SETTINGS_FILE_NAME: &str = "foldertree.yaml";
pub const DEFAULT_DATA_FILE: &str = "data/folderData.json";
pub const DEFAULT_ROOT_NAME: &str = "root";

fn get_settings_file_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE_NAME)
}

/// Values read from `foldertree.yaml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub root_name: String,
    /// `None` leaves the decision to terminal detection.
    pub color: Option<bool>,
    pub show_menu: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            root_name: DEFAULT_ROOT_NAME.to_string(),
            color: None,
            show_menu: true,
        }
    }
}

impl Settings {
    /// Reads the settings file under `root`, falling back to defaults when
    /// there is none.
    pub async fn read(root: &Path) -> Result<Self, SettingsError> {
        Self::from_path(get_settings_file_path(root)).await
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, SettingsError> {
        debug!("Opening settings file: {}", path.best_effort_display());
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                info!("No settings file found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::ReadError {
                    file_path: path.best_effort_display(),
                    source,
                });
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        debug!("Read settings file: {} bytes", bytes.len());
        contents.as_ref().try_into()
    }

    fn apply(mut self, top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, SettingsError> {
        if let Some(value) = lookup(top_level, "data_file") {
            self.data_file = PathBuf::from(expect_str(value, "data_file")?);
        }
        if let Some(value) = lookup(top_level, "root_name") {
            let name = expect_str(value, "root_name")?;
            ensure!(
                !name.is_empty(),
                InvalidValueSnafu {
                    key: "root_name",
                    expected: "a non-empty string",
                }
            );
            self.root_name = name.to_string();
        }
        if let Some(value) = lookup(top_level, "color") {
            self.color = Some(expect_bool(value, "color")?);
        }
        if let Some(value) = lookup(top_level, "show_menu") {
            self.show_menu = expect_bool(value, "show_menu")?;
        }
        Ok(self)
    }
}

fn lookup<'a, 'input>(
    mapping: &'a LinkedHashMap<Yaml<'input>, Yaml<'input>>,
    key: &'static str,
) -> Option<&'a Yaml<'input>> {
    mapping.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
}

fn expect_str<'a>(value: &'a Yaml<'_>, key: &'static str) -> Result<&'a str, SettingsError> {
    value.as_str().context(InvalidValueSnafu {
        key,
        expected: "a string",
    })
}

fn expect_bool(value: &Yaml<'_>, key: &'static str) -> Result<bool, SettingsError> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Ok(*flag),
        _ => InvalidValueSnafu {
            key,
            expected: "true or false",
        }
        .fail(),
    }
}

impl TryFrom<&str> for Settings {
    type Error = SettingsError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents =
            Yaml::load_from_str(contents).map_err(|e| SettingsError::ParseError { source: e })?;
        let document = documents.first().ok_or(SettingsError::MalformedSettings)?;

        let top_level = document
            .as_mapping()
            .ok_or(SettingsError::TopLevelNotMap)?;

        Settings::default().apply(top_level)
    }
}

#[derive(Debug, Snafu)]
pub enum SettingsError {
    #[snafu(display("Failed to read the settings file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the settings file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted settings file"))]
    MalformedSettings,
    #[snafu(display("Top level of the settings file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Setting '{}' should be {}", key, expected))]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },
}
