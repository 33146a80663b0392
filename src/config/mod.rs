mod settings;

pub use settings::{DEFAULT_ROOT_NAME, Settings, SettingsError};
