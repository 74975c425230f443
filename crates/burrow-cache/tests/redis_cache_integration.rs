use std::time::Duration;

use burrow_cache::{LayeredCache, MokaUrlCache, RedisUrlCache, UrlCache};
use burrow_core::{Origin, ShortCode, ShortCodeRecord};
use burrow_test_infra::redis::RedisServer;

fn record(code: &str, url: &str) -> ShortCodeRecord {
    ShortCodeRecord::new(ShortCode::new_unchecked(code), url, Origin::Generated)
}

async fn redis_cache(server: &RedisServer) -> RedisUrlCache {
    let url = server.url().await.expect("redis url");
    RedisUrlCache::connect(&url).await.expect("connect redis")
}

#[tokio::test]
async fn redis_cache_set_and_get() {
    let server = RedisServer::new().await.expect("start redis");
    let cache = redis_cache(&server).await;
    let r = record("abc1234", "https://example.com");

    assert!(cache.get_url(&r.code).await.unwrap().is_none());
    cache.set_url(&r).await.unwrap();
    assert_eq!(cache.get_url(&r.code).await.unwrap(), Some(r));
}

#[tokio::test]
async fn redis_cache_uses_prefixed_keys() {
    let server = RedisServer::new().await.expect("start redis");
    let cache = redis_cache(&server).await.with_prefix("test:");
    let r = record("abc1234", "https://example.com");
    cache.set_url(&r).await.unwrap();

    let mut conn = server.connection().await.expect("redis connection");
    let raw: Option<String> = redis::cmd("GET")
        .arg("test:abc1234")
        .query_async(&mut conn)
        .await
        .unwrap();

    assert!(raw.unwrap().contains("https://example.com"));
}

#[tokio::test]
async fn redis_cache_ttl_expires_entries() {
    let server = RedisServer::new().await.expect("start redis");
    let cache = redis_cache(&server)
        .await
        .with_ttl(Duration::from_secs(1));
    let r = record("abc1234", "https://example.com");

    cache.set_url(&r).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    assert!(cache.get_url(&r.code).await.unwrap().is_none());
}

#[tokio::test]
async fn redis_cache_reports_corrupt_values() {
    let server = RedisServer::new().await.expect("start redis");
    let cache = redis_cache(&server).await;

    let mut conn = server.connection().await.expect("redis connection");
    let _: () = redis::cmd("SET")
        .arg("burrow:url:corrupt")
        .arg("not json")
        .query_async(&mut conn)
        .await
        .unwrap();

    let err = cache
        .get_url(&ShortCode::new_unchecked("corrupt"))
        .await
        .unwrap_err();
    assert!(matches!(err, burrow_cache::CacheError::InvalidData(_)));
}

#[tokio::test]
async fn layered_cache_backfills_moka_from_redis() {
    let server = RedisServer::new().await.expect("start redis");
    let l2 = redis_cache(&server).await;
    let r = record("abc1234", "https://example.com");
    l2.set_url(&r).await.unwrap();

    let cache = LayeredCache::new(MokaUrlCache::with_capacity(100), l2);
    let got = cache
        .get_or_compute(&r.code, |_| async { Ok(None) })
        .await
        .unwrap();

    assert_eq!(got, Some(r.clone()));
    assert_eq!(cache.l1().get_url(&r.code).await.unwrap(), Some(r));
}
