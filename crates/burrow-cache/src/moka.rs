use crate::cache::{Result, UrlCache};
use async_trait::async_trait;
use burrow_core::{CacheError, ShortCode, ShortCodeRecord};
use moka::future::Cache;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

const DEFAULT_CAPACITY: u64 = 100_000;

/// Why a single-flight load produced no value. Moka never caches an `Err`,
/// which is how absent codes stay out of the cache.
#[derive(Debug)]
enum Miss {
    Absent,
    Failed(CacheError),
}

/// A bounded in-memory cache backed by Moka.
///
/// Eviction is TinyLFU admission with LRU order. Concurrent
/// [`get_or_compute`](UrlCache::get_or_compute) calls for one code share a
/// single fetch.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<ShortCode, ShortCodeRecord>,
}

impl MokaUrlCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(max_capacity: u64) -> Self {
        CacheConfig::builder().max_capacity(max_capacity).build().into()
    }

    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Number of cached entries. Moka applies writes lazily, so this may lag.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        let record = self.cache.get(code).await;
        match record {
            Some(_) => debug!(code = %code, "moka cache hit"),
            None => trace!(code = %code, "moka cache miss"),
        }
        Ok(record)
    }

    async fn set_url(&self, record: &ShortCodeRecord) -> Result<()> {
        self.cache
            .insert(record.code.clone(), record.clone())
            .await;
        trace!(code = %record.code, "cached record in moka");
        Ok(())
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
        let loaded = self
            .cache
            .try_get_with(code.clone(), async {
                trace!(code = %code, "cache miss, performing single-flight fetch");
                match fetch(code).await {
                    Ok(Some(record)) => Ok(record),
                    Ok(None) => Err(Miss::Absent),
                    Err(e) => Err(Miss::Failed(e)),
                }
            })
            .await;

        match loaded {
            Ok(record) => Ok(Some(record)),
            Err(miss) => match miss.as_ref() {
                Miss::Absent => Ok(None),
                Miss::Failed(e) => Err(e.clone()),
            },
        }
    }
}

/// Configuration for a [`MokaUrlCache`].
#[derive(Debug, TypedBuilder)]
pub struct CacheConfig {
    #[builder(default = DEFAULT_CAPACITY)]
    max_capacity: u64,
    /// Time-to-live from insertion. Records are immutable, so this only
    /// bounds memory held by cold entries.
    #[builder(default)]
    ttl: Option<Duration>,
    /// Time-to-idle since last access.
    #[builder(default)]
    tti: Option<Duration>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);

        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}
