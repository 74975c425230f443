use std::sync::Arc;

use crate::redirector::Redirector;
use crate::{RedirectorError, Result};
use async_trait::async_trait;
use burrow_core::{ReadRepository, ShortCode};
use tokio::time::Instant;
use tracing::{debug, trace};

/// Service for handling URL redirects.
///
/// Stateless apart from the repository; clones share it.
#[derive(Debug)]
pub struct RedirectorService<R> {
    repository: Arc<R>,
}

impl<R> Clone for RedirectorService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ReadRepository> RedirectorService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    /// Uses a repository that is also held elsewhere, e.g. by the shortener.
    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    async fn lookup(&self, code: &ShortCode) -> Result<String> {
        trace!(code = %code, "resolving short code");

        match self.repository.get(code).await? {
            Some(record) => {
                debug!(code = %code, url = %record.long_url, "resolved short code");
                Ok(record.long_url)
            }
            None => {
                debug!(code = %code, "short code not found");
                Err(RedirectorError::NotFound(code.to_string()))
            }
        }
    }
}

#[async_trait]
impl<R: ReadRepository> Redirector for RedirectorService<R> {
    async fn resolve_within(&self, code: &ShortCode, deadline: Option<Instant>) -> Result<String> {
        let Some(deadline) = deadline else {
            return self.lookup(code).await;
        };

        tokio::time::timeout_at(deadline, self.lookup(code))
            .await
            .map_err(|_| RedirectorError::Timeout)?
    }
}
