//! Wires storage, caches and services together from the command line.

use std::sync::Arc;

use burrow_cache::{CacheConfig, LayeredCache, MokaUrlCache, NegativeCache, RedisUrlCache};
use burrow_core::{CacheError, Repository, ShortCode, StorageError};
use burrow_generator::{
    CounterSettings, Generator, GeneratorError, PermutedCounterGenerator, RandomGenerator,
};
use burrow_redirector::{CachedRepository, RedirectorService};
use burrow_shortener::{ShortenerConfig, ShortenerService};
use burrow_storage::{InMemoryRepository, MySqlRepository};
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::app::shadowed_segments;
use crate::config::{Cli, GeneratorArg, StorageBackendArg};
use crate::state::AppState;

/// Read path cache: in-process first, Redis second when configured.
pub type UrlCacheStack = LayeredCache<MokaUrlCache, Option<RedisUrlCache>>;

pub type SharedRepository = CachedRepository<Arc<dyn Repository>, UrlCacheStack>;

pub type SharedGenerator = Arc<dyn Generator<Output = ShortCode>>;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("storage setup failed: {0}")]
    Storage(#[from] StorageError),
    #[error("cache setup failed: {0}")]
    Cache(#[from] CacheError),
    #[error("generator setup failed: {0}")]
    Generator(#[from] GeneratorError),
    #[error("invalid public base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("mysql dsn is required when storage backend is mysql")]
    MissingMysqlDsn,
}

/// Builds the shared state behind every route.
pub async fn build_state(cli: &Cli) -> Result<AppState, BootstrapError> {
    let public_host = public_host(&cli.public_base_url)?;

    let repository = build_repository(cli).await?;
    let cache = build_cache(cli).await?;

    let mut cached = CachedRepository::new(repository, cache);
    if let Some(ttl) = cli.negative_cache_ttl() {
        cached = cached.with_negative_cache(NegativeCache::new(cli.cache_capacity, ttl));
    }
    let shared: Arc<SharedRepository> = Arc::new(cached);

    let config = ShortenerConfig::builder()
        .max_attempts(cli.max_attempts)
        .storage_retry_limit(cli.storage_retry_limit)
        .reuse_existing(cli.reuse_existing)
        .public_host(public_host)
        .reserved_aliases(shadowed_segments(&cli.api_path))
        .build();

    let shortener = ShortenerService::with_config(Arc::clone(&shared), build_generator(cli)?, config);
    let redirector = RedirectorService::from_shared(shared);

    let mut state = AppState::new(
        Arc::new(shortener),
        Arc::new(redirector),
        &cli.public_base_url,
    );
    if let Some(timeout) = cli.request_timeout() {
        state = state.with_request_timeout(timeout);
    }

    info!(
        storage_backend = %cli.storage,
        generator = %cli.generator,
        redis = cli.redis_url.is_some(),
        negative_cache = cli.negative_cache_ttl().is_some(),
        "application state ready"
    );

    Ok(state)
}

async fn build_repository(cli: &Cli) -> Result<Arc<dyn Repository>, BootstrapError> {
    match cli.storage {
        StorageBackendArg::InMemory => Ok(Arc::new(InMemoryRepository::new())),
        StorageBackendArg::Mysql => {
            let dsn = cli
                .mysql_dsn
                .as_deref()
                .ok_or(BootstrapError::MissingMysqlDsn)?;
            let repository = MySqlRepository::connect(dsn, cli.mysql_max_connections).await?;
            repository.ensure_schema().await?;
            Ok(Arc::new(repository))
        }
    }
}

async fn build_cache(cli: &Cli) -> Result<UrlCacheStack, BootstrapError> {
    let l1: MokaUrlCache = CacheConfig::builder()
        .max_capacity(cli.cache_capacity)
        .ttl(cli.cache_ttl())
        .build()
        .into();

    let l2 = match &cli.redis_url {
        Some(url) => {
            let mut redis = RedisUrlCache::connect(url).await?;
            if let Some(ttl) = cli.redis_ttl() {
                redis = redis.with_ttl(ttl);
            }
            Some(redis)
        }
        None => None,
    };

    Ok(LayeredCache::new(l1, l2))
}

fn build_generator(cli: &Cli) -> Result<SharedGenerator, BootstrapError> {
    match cli.generator {
        GeneratorArg::Random => Ok(Arc::new(RandomGenerator::new())),
        GeneratorArg::Counter => {
            let settings = CounterSettings::builder().start(cli.counter_start).build();
            Ok(Arc::new(PermutedCounterGenerator::new(settings)?))
        }
    }
}

/// Host that long URLs may not point back at.
fn public_host(base_url: &str) -> Result<String, BootstrapError> {
    let invalid = |reason: String| BootstrapError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }

    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| invalid("missing host".to_string()))
}
