use crate::error::ShortenerError;
use crate::record::ShortCodeRecord;
use async_trait::async_trait;
use tokio::time::Instant;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The URL to be shortened.
    pub long_url: String,
    /// Optional caller-chosen alias. Validated by the shortener.
    pub custom_alias: Option<String>,
    /// Point in time after which the call gives up with `Timeout`.
    pub deadline: Option<Instant>,
}

impl ShortenParams {
    pub fn new(long_url: impl Into<String>) -> Self {
        Self {
            long_url: long_url.into(),
            custom_alias: None,
            deadline: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.custom_alias = Some(alias.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Result of a successful [`Shortener::shorten`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenOutcome {
    pub record: ShortCodeRecord,
    /// `true` when an existing record for the same long URL was returned
    /// instead of allocating a new code.
    pub reused: bool,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL and returns the stored record.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortenOutcome>;
}
