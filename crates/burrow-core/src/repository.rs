use crate::error::StorageError;
use crate::record::ShortCodeRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of a repository.
///
/// This trait provides only the read operations from [`Repository`],
/// allowing services like the redirector to have read-only access.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>>;

    /// Checks whether a short code already exists in the repository.
    async fn exists(&self, code: &ShortCode) -> Result<bool>;

    /// Returns the earliest record created for `long_url`, if any.
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortCodeRecord>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Stores `record` only if its code is unused.
    ///
    /// Returns `Err(Conflict)` if the code already exists. The check and the
    /// write happen atomically: of any number of concurrent inserts for one
    /// code, exactly one succeeds.
    async fn insert_if_absent(&self, record: ShortCodeRecord) -> Result<ShortCodeRecord>;
}

#[async_trait]
impl<T: ReadRepository + ?Sized> ReadRepository for Arc<T> {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        (**self).get(code).await
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        (**self).exists(code).await
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortCodeRecord>> {
        (**self).find_by_long_url(long_url).await
    }
}

#[async_trait]
impl<T: Repository + ?Sized> Repository for Arc<T> {
    async fn insert_if_absent(&self, record: ShortCodeRecord) -> Result<ShortCodeRecord> {
        (**self).insert_if_absent(record).await
    }
}
