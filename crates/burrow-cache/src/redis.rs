use crate::cache::{Result, UrlCache};
use async_trait::async_trait;
use burrow_core::{CacheError, ShortCode, ShortCodeRecord};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, trace, warn};

const DEFAULT_PREFIX: &str = "burrow:url:";

/// A Redis-backed [`UrlCache`] storing records as JSON strings.
#[derive(Clone)]
pub struct RedisUrlCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Option<Duration>,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() {
        CacheError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_dropped() || err.is_connection_refusal() {
        CacheError::Unavailable(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisUrlCache {
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_PREFIX.to_string(),
            ttl: None,
        }
    }

    /// Connects to `url` and opens a multiplexed connection.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to redis", e))?;
        Ok(Self::new(conn))
    }

    pub fn with_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Expire entries after `ttl`, rounded up to whole seconds.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn cache_key(&self, code: &ShortCode) -> String {
        format!("{}{}", self.key_prefix, code.as_str())
    }
}

impl std::fmt::Debug for RedisUrlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisUrlCache")
            .field("key_prefix", &self.key_prefix)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UrlCache for RedisUrlCache {
    async fn get_url(&self, code: &ShortCode) -> Result<Option<ShortCodeRecord>> {
        let key = self.cache_key(code);

        let mut conn = self.conn.clone();
        let cached = conn
            .get::<_, Option<String>>(&key)
            .await
            .map_err(|e| map_redis_error("failed to fetch value from redis", e))?;

        let Some(cached) = cached else {
            trace!(code = %code, "redis cache miss");
            return Ok(None);
        };

        debug!(code = %code, "redis cache hit");
        serde_json::from_str::<ShortCodeRecord>(&cached)
            .map(Some)
            .map_err(|e| {
                warn!(code = %code, error = %e, "failed to deserialize cached record");
                CacheError::InvalidData(format!("invalid cached value for key '{key}': {e}"))
            })
    }

    async fn set_url(&self, record: &ShortCodeRecord) -> Result<()> {
        let key = self.cache_key(&record.code);
        let json = serde_json::to_string(record)
            .map_err(|e| CacheError::Serialization(format!("failed to serialize record: {e}")))?;

        let mut conn = self.conn.clone();
        let written = match self.ttl {
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(&key, json, expiry_seconds(ttl))
                    .await
            }
            None => conn.set::<_, _, ()>(&key, json).await,
        };

        written.map_err(|e| map_redis_error("failed to write value to redis", e))?;
        trace!(code = %record.code, "cached record in redis");
        Ok(())
    }
}

/// `SET EX` takes whole seconds; partial seconds count as a full one.
fn expiry_seconds(ttl: Duration) -> u64 {
    let partial = u64::from(ttl.subsec_nanos() > 0);
    (ttl.as_secs() + partial).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_rounds_up_to_whole_seconds() {
        assert_eq!(expiry_seconds(Duration::ZERO), 1);
        assert_eq!(expiry_seconds(Duration::from_millis(200)), 1);
        assert_eq!(expiry_seconds(Duration::from_secs(1)), 1);
        assert_eq!(expiry_seconds(Duration::from_millis(1_500)), 2);
        assert_eq!(expiry_seconds(Duration::from_secs(90)), 90);
    }
}
