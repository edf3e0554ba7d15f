use crate::sync::SyncError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No matchday roster is loaded")]
    NoMatchday,

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl SessionError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            SessionError::NoMatchday => false,
            SessionError::Sync(e) => e.is_recoverable(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
