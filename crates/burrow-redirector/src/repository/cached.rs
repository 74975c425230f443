use async_trait::async_trait;
use burrow_cache::{NegativeCache, UrlCache};
use burrow_core::repository::{ReadRepository, Repository, Result};
use burrow_core::{CacheError, ShortCode, ShortCodeRecord};
use tracing::{debug, trace, warn};

/// A repository decorator that adds caching.
///
/// Reads check the cache first and fall back to the inner repository under
/// the cache's single-flight. Cache failures never fail a read: they are
/// logged and the inner repository is asked directly.
///
/// Writes go to the inner repository and then populate the cache, so a
/// record is resolvable from cache right after it is created.
#[derive(Debug, Clone)]
pub struct CachedRepository<R, C> {
    inner: R,
    cache: C,
    negative: Option<NegativeCache>,
}

impl<R: ReadRepository, C: UrlCache> CachedRepository<R, C> {
    pub fn new(inner: R, cache: C) -> Self {
        Self {
            inner,
            cache,
            negative: None,
        }
    }

    /// Remember codes the inner repository reported missing.
    pub fn with_negative_cache(mut self, negative: NegativeCache) -> Self {
        self.negative = Some(negative);
        self
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Marks `code` as missing, then reads the store once more.
    ///
    /// An insert that commits before the second read is seen by it. One that
    /// commits after it clears the mark itself, since its removal runs after
    /// the mark was set.
    async fn mark_missing(
        &self,
        negative: &NegativeCache,
        code: &ShortCode,
    ) -> Result<Option<ShortCodeRecord>> {
        negative.mark(code).await;

        let found = match self.inner.get(code).await {
            Ok(found) => found,
            Err(e) => {
                negative.remove(code).await;
                return Err(e);
            }
        };

        if let Some(record) = &found {
            debug!(code = %code, "code inserted during lookup");
            negative.remove(code).await;
            if let Err(e) = self.cache.set_url(record).await {
                warn!(code = %code, error = %e, "failed to warm cache after late insert");
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl<R: ReadRepository, C: UrlCache> ReadRepository for CachedRepository<R, C> {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        if let Some(negative) = &self.negative {
            if negative.contains(code) {
                // An insert may have landed since the code was marked.
                if let Ok(Some(record)) = self.cache.get_url(code).await {
                    negative.remove(code).await;
                    return Ok(Some(record));
                }
                trace!(code = %code, "negative cache hit");
                return Ok(None);
            }
        }

        let cached = self
            .cache
            .get_or_compute(code, move |c| {
                let code = c.clone();
                async move {
                    trace!(code = %code, "cache miss, fetching from inner repository");
                    self.inner.get(&code).await.map_err(CacheError::Upstream)
                }
            })
            .await;

        let found = match cached {
            Ok(found) => found,
            Err(CacheError::Upstream(e)) => return Err(e),
            Err(e) => {
                warn!(code = %code, error = %e, "cache failed, reading inner repository directly");
                self.inner.get(code).await?
            }
        };

        match &self.negative {
            Some(negative) if found.is_none() => self.mark_missing(negative, code).await,
            _ => Ok(found),
        }
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        match self.cache.get_url(code).await {
            Ok(Some(_)) => {
                debug!(code = %code, "cache hit indicates code exists");
                return Ok(true);
            }
            Ok(None) => {}
            Err(e) => {
                warn!(code = %code, error = %e, "cache error on existence check, falling back to inner repository");
            }
        }

        self.inner.exists(code).await
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<ShortCodeRecord>> {
        self.inner.find_by_long_url(long_url).await
    }
}

#[async_trait]
impl<R: Repository, C: UrlCache> Repository for CachedRepository<R, C> {
    async fn insert_if_absent(&self, record: ShortCodeRecord) -> Result<ShortCodeRecord> {
        let stored = self.inner.insert_if_absent(record).await?;

        if let Some(negative) = &self.negative {
            negative.remove(&stored.code).await;
        }
        if let Err(e) = self.cache.set_url(&stored).await {
            warn!(code = %stored.code, error = %e, "failed to warm cache after insert");
        }

        Ok(stored)
    }
}
