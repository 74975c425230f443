use burrow_core::ShortCode;
use moka::future::Cache;
use std::time::Duration;
use tracing::trace;

/// Short-lived memory of codes the store reported as missing.
///
/// Shields the store from repeated lookups of unknown codes. Entries must be
/// [`remove`](NegativeCache::remove)d when the code is created, otherwise
/// the new record stays hidden until the entry expires.
#[derive(Debug, Clone)]
pub struct NegativeCache {
    cache: Cache<ShortCode, ()>,
}

impl NegativeCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub fn contains(&self, code: &ShortCode) -> bool {
        self.cache.contains_key(code)
    }

    pub async fn mark(&self, code: &ShortCode) {
        trace!(code = %code, "remembering missing code");
        self.cache.insert(code.clone(), ()).await;
    }

    pub async fn remove(&self, code: &ShortCode) {
        self.cache.invalidate(code).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn marks_expire_after_ttl() {
        let negative = NegativeCache::new(100, Duration::from_millis(50));
        let code = ShortCode::new_unchecked("ghost00");

        negative.mark(&code).await;
        assert!(negative.contains(&code));

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(!negative.contains(&code));
    }

    #[tokio::test]
    async fn remove_forgets_a_code() {
        let negative = NegativeCache::new(100, Duration::from_secs(60));
        let code = ShortCode::new_unchecked("ghost00");

        negative.mark(&code).await;
        negative.remove(&code).await;

        assert!(!negative.contains(&code));
    }
}
