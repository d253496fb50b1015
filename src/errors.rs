use std::path::{Path, PathBuf};

/// Expected invalid input to a command. Nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("habit name must not be empty")]
    EmptyName,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode tracker state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Failure of a tracker command.
///
/// `Rejected` means the command was a no-op. `Storage` means the in-memory model
/// was updated but could not be written out; a later save retries it.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("failed to persist tracker state: {0}")]
    Storage(#[from] StorageError),
}

impl TrackerError {
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
