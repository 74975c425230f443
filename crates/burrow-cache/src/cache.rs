use async_trait::async_trait;
use burrow_core::{CacheError, ShortCode, ShortCodeRecord};
use std::future::Future;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, CacheError>;

/// A cache of [`ShortCodeRecord`]s keyed by [`ShortCode`].
///
/// Records never change once stored, so a cached copy is always valid and
/// concurrent writers of one key always write the same value.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get_url(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>>;

    /// Stores `record` under its own code.
    async fn set_url(&self, record: &ShortCodeRecord) -> Result<()>;

    /// Get record from cache, computing it if not present.
    ///
    /// `None` from `fetch` is returned as is and never cached. Implementations
    /// that can coalesce concurrent misses should override this.
    async fn get_or_compute<F, Fut>(
        &self,
        code: &ShortCode,
        fetch: F,
    ) -> Result<Option<ShortCodeRecord>>
    where
        F: FnOnce(&ShortCode) -> Fut + Send,
        Fut: Future<Output = Result<Option<ShortCodeRecord>>> + Send,
    {
        if let Some(record) = self.get_url(code).await? {
            return Ok(Some(record));
        }

        let record = fetch(code).await?;
        if let Some(ref value) = record {
            self.set_url(value).await?;
        }
        Ok(record)
    }
}

#[async_trait]
impl<C: UrlCache> UrlCache for Arc<C> {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        (**self).get_url(code).await
    }

    async fn set_url(&self, record: &ShortCodeRecord) -> Result<()> {
        (**self).set_url(record).await
    }

    async fn get_or_compute<F, Fut>(
        &self,
        code: &ShortCode,
        fetch: F,
    ) -> Result<Option<ShortCodeRecord>>
    where
        F: FnOnce(&ShortCode) -> Fut + Send,
        Fut: Future<Output = Result<Option<ShortCodeRecord>>> + Send,
    {
        (**self).get_or_compute(code, fetch).await
    }
}

/// A disabled cache layer: every lookup misses and writes are dropped.
#[async_trait]
impl<C: UrlCache> UrlCache for Option<C> {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        match self {
            Some(cache) => cache.get_url(code).await,
            None => Ok(None),
        }
    }

    async fn set_url(&self, record: &ShortCodeRecord) -> Result<()> {
        match self {
            Some(cache) => cache.set_url(record).await,
            None => Ok(()),
        }
    }
}
