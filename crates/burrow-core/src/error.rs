use std::fmt::Display;
use thiserror::Error;

/// Errors related to the core model (parsing and validation).
pub type Result<T> = std::result::Result<T, CoreError>;

/// Stable, machine-readable classification of every failure a caller can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested custom alias is already owned by another record.
    AliasTaken,
    /// Every generated candidate collided; the code space is saturated or the
    /// generator is defective.
    GenerationExhausted,
    /// The short code is unknown.
    NotFound,
    /// Malformed URL, alias or request body.
    InvalidInput,
    /// The caller's deadline elapsed.
    Timeout,
    /// The mapping store could not serve the request.
    StorageUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::AliasTaken => "alias_taken",
            ErrorKind::GenerationExhausted => "generation_exhausted",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Timeout => "timeout",
            ErrorKind::StorageUnavailable => "storage_unavailable",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

impl StorageError {
    /// Failures that may clear up on their own (connection loss, pool
    /// exhaustion), as opposed to conflicts or corrupt data.
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
    /// The fetch behind a cache miss failed. Carried through untouched so the
    /// caller can tell a store failure from a cache failure.
    #[error("upstream fetch failed: {0}")]
    Upstream(#[source] StorageError),
}

/// Errors surfaced by the allocation path.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("alias already exists: {0}")]
    AliasTaken(String),
    #[error("no free short code after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("deadline exceeded while shortening")]
    Timeout,
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl ShortenerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShortenerError::AliasTaken(_) => ErrorKind::AliasTaken,
            ShortenerError::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
            ShortenerError::InvalidUrl(_) | ShortenerError::InvalidShortCode(_) => {
                ErrorKind::InvalidInput
            }
            ShortenerError::Timeout => ErrorKind::Timeout,
            ShortenerError::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }
}

impl From<CoreError> for ShortenerError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::InvalidShortCode(message) => Self::InvalidShortCode(message),
        }
    }
}

impl From<StorageError> for ShortenerError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::Conflict(code) => Self::AliasTaken(code),
            other => Self::StorageUnavailable(other.to_string()),
        }
    }
}
