use burrow_core::{ErrorKind, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    #[error("short code not found: {0}")]
    NotFound(String),
    /// The code cannot exist, so it is reported as unknown.
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("deadline exceeded while resolving")]
    Timeout,
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl RedirectorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RedirectorError::NotFound(_) | RedirectorError::InvalidShortCode(_) => {
                ErrorKind::NotFound
            }
            RedirectorError::Timeout => ErrorKind::Timeout,
            RedirectorError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl From<StorageError> for RedirectorError {
    fn from(value: StorageError) -> Self {
        Self::StorageUnavailable(value.to_string())
    }
}
