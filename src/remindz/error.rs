use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemindzError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt reminder cache: {0}")]
    CorruptCache(#[source] serde_json::Error),

    #[error("Invalid time: {0:?} (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM)")]
    InvalidTime(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, RemindzError>;
