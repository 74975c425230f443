use crate::cache::{Result, UrlCache};
use async_trait::async_trait;
use burrow_core::{ShortCode, ShortCodeRecord};
use std::future::Future;
use tracing::{debug, trace, warn};

/// A two-level cache: a fast local L1 in front of a shared L2.
///
/// - **Get**: L1, then L2. An L2 hit is back-filled into L1.
/// - **Set**: L2 first, then L1.
///
/// L1 is authoritative for failures. L2 is best effort: an L2 error is
/// logged and treated as a miss, so a Redis outage degrades to L1 plus the
/// store instead of failing reads.
#[derive(Debug, Clone)]
pub struct LayeredCache<L1, L2> {
    l1: L1,
    l2: L2,
}

impl<L1, L2> LayeredCache<L1, L2> {
    pub fn new(l1: L1, l2: L2) -> Self {
        Self { l1, l2 }
    }

    pub fn l1(&self) -> &L1 {
        &self.l1
    }

    pub fn l2(&self) -> &L2 {
        &self.l2
    }
}

impl<L1, L2: UrlCache> LayeredCache<L1, L2> {
    async fn l2_get(&self, code: &ShortCode) -> Option<ShortCodeRecord> {
        match self.l2.get_url(code).await {
            Ok(found) => found,
            Err(e) => {
                warn!(code = %code, error = %e, "L2 cache read failed, treating as miss");
                None
            }
        }
    }

    async fn l2_set(&self, record: &ShortCodeRecord) {
        if let Err(e) = self.l2.set_url(record).await {
            warn!(code = %record.code, error = %e, "L2 cache write failed");
        }
    }
}

#[async_trait]
impl<L1, L2> UrlCache for LayeredCache<L1, L2>
where
    L1: UrlCache,
    L2: UrlCache,
{
    async fn get_url(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        if let Some(record) = self.l1.get_url(code).await? {
            return Ok(Some(record));
        }

        trace!(code = %code, "L1 cache miss, trying L2");
        let Some(record) = self.l2_get(code).await else {
            return Ok(None);
        };

        debug!(code = %code, "L2 cache hit, backfilling L1");
        self.l1.set_url(&record).await?;
        Ok(Some(record))
    }

    async fn set_url(&self, record: &ShortCodeRecord) -> Result<()> {
        self.l2_set(record).await;
        self.l1.set_url(record).await
    }

    /// Runs under L1's single-flight, so concurrent misses for one code
    /// make at most one L2 probe and one upstream fetch.
    async fn get_or_compute<F, Fut>(
        &self,
        code: &ShortCode,
        fetch: F,
    ) -> Result<Option<ShortCodeRecord>>
    where
        F: FnOnce(&ShortCode) -> Fut + Send,
        Fut: Future<Output = Result<Option<ShortCodeRecord>>> + Send,
    {
        self.l1
            .get_or_compute(code, move |c| {
                let c = c.clone();
                async move {
                    if let Some(record) = self.l2_get(&c).await {
                        debug!(code = %c, "L2 cache hit");
                        return Ok(Some(record));
                    }

                    let fetched = fetch(&c).await?;
                    if let Some(ref record) = fetched {
                        self.l2_set(record).await;
                    }
                    Ok(fetched)
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MokaUrlCache;
    use burrow_core::{CacheError, Origin};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct BrokenCache;

    #[async_trait]
    impl UrlCache for BrokenCache {
        async fn get_url(&self, _code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }

        async fn set_url(&self, _record: &ShortCodeRecord) -> Result<()> {
            Err(CacheError::Unavailable("connection refused".to_string()))
        }
    }

    fn record(code: &str, url: &str) -> ShortCodeRecord {
        ShortCodeRecord::new(ShortCode::new_unchecked(code), url, Origin::Generated)
    }

    fn create_test_cache() -> LayeredCache<MokaUrlCache, MokaUrlCache> {
        LayeredCache::new(
            MokaUrlCache::with_capacity(100),
            MokaUrlCache::with_capacity(100),
        )
    }

    #[tokio::test]
    async fn get_backfills_l1_from_l2() {
        let cache = create_test_cache();
        let r = record("abc1234", "https://example.com");
        cache.l2().set_url(&r).await.unwrap();

        assert!(cache.l1().get_url(&r.code).await.unwrap().is_none());
        assert_eq!(cache.get_url(&r.code).await.unwrap(), Some(r.clone()));
        assert_eq!(cache.l1().get_url(&r.code).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn set_writes_to_both_layers() {
        let cache = create_test_cache();
        let r = record("abc1234", "https://example.com");

        cache.set_url(&r).await.unwrap();

        assert_eq!(cache.l1().get_url(&r.code).await.unwrap(), Some(r.clone()));
        assert_eq!(cache.l2().get_url(&r.code).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn get_or_compute_prefers_l2_over_fetch() {
        let cache = create_test_cache();
        let r = record("abc1234", "https://from-l2.example");
        cache.l2().set_url(&r).await.unwrap();
        let fetches = AtomicUsize::new(0);

        let got = cache
            .get_or_compute(&r.code, |_| {
                fetches.fetch_add(1, Ordering::SeqCst);
                async { Ok(None) }
            })
            .await
            .unwrap();

        assert_eq!(got, Some(r.clone()));
        assert_eq!(fetches.load(Ordering::SeqCst), 0);
        assert_eq!(cache.l1().get_url(&r.code).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn get_or_compute_fills_both_layers_after_fetch() {
        let cache = create_test_cache();
        let r = record("abc1234", "https://fetched.example");

        let got = cache
            .get_or_compute(&r.code, |_| {
                let r = r.clone();
                async move { Ok(Some(r)) }
            })
            .await
            .unwrap();

        assert_eq!(got.as_ref(), Some(&r));
        assert_eq!(cache.l2().get_url(&r.code).await.unwrap(), Some(r));
    }

    #[tokio::test]
    async fn l2_failures_degrade_to_fetch() {
        let cache = LayeredCache::new(MokaUrlCache::with_capacity(100), BrokenCache);
        let r = record("abc1234", "https://fetched.example");

        assert!(cache.get_url(&r.code).await.unwrap().is_none());
        cache.set_url(&r).await.unwrap();

        let other = record("xyz9876", "https://other.example");
        let got = cache
            .get_or_compute(&other.code, |_| {
                let other = other.clone();
                async move { Ok(Some(other)) }
            })
            .await
            .unwrap();
        assert_eq!(got, Some(other));
    }
}
