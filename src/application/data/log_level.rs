use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    /// `None` means no subscriber should be installed at all.
    pub fn to_level_filter(self) -> Option<LevelFilter> {
        match self {
            LogLevel::Debug => Some(LevelFilter::DEBUG),
            LogLevel::Info => Some(LevelFilter::INFO),
            LogLevel::Warn => Some(LevelFilter::WARN),
            LogLevel::Error => Some(LevelFilter::ERROR),
            LogLevel::Silent => None,
        }
    }
}
