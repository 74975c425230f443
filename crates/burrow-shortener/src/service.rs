use crate::config::ShortenerConfig;
use crate::validation::normalize_long_url;
use async_trait::async_trait;
use burrow_core::{
    Origin, Repository, ShortCode, ShortCodeRecord, ShortenOutcome, ShortenParams, Shortener,
    ShortenerError, StorageError,
};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// A concrete implementation of the [`Shortener`] trait.
///
/// Uniqueness comes from the repository's conditional insert alone: a
/// generated code that is already taken is simply replaced by a fresh draw.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    config: ShortenerConfig,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
            config: self.config.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        Self::with_config(Arc::new(repository), generator, ShortenerConfig::default())
    }

    pub fn with_config(repository: Arc<R>, generator: G, config: ShortenerConfig) -> Self {
        Self {
            repository,
            generator: Arc::new(generator),
            config,
        }
    }

    pub fn config(&self) -> &ShortenerConfig {
        &self.config
    }

    async fn shorten_now(&self, params: ShortenParams) -> Result<ShortenOutcome> {
        let long_url = normalize_long_url(&params.long_url, self.config.public_host.as_deref())?;

        let alias = params
            .custom_alias
            .as_deref()
            .map(str::trim)
            .filter(|alias| !alias.is_empty());

        match alias {
            Some(alias) => self.reserve_alias(alias, long_url).await,
            None => {
                if self.config.reuse_existing {
                    if let Some(record) = self.repository.find_by_long_url(&long_url).await? {
                        debug!(code = %record.code, "reusing existing short code");
                        return Ok(ShortenOutcome {
                            record,
                            reused: true,
                        });
                    }
                }
                self.allocate_generated(long_url).await
            }
        }
    }

    /// One conditional insert. A taken alias is final: no retry, no fallback.
    async fn reserve_alias(&self, alias: &str, long_url: String) -> Result<ShortenOutcome> {
        let code = ShortCode::custom(alias)?;
        if self
            .config
            .reserved_aliases
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(code.as_str()))
        {
            return Err(ShortenerError::InvalidShortCode(format!(
                "'{code}' is reserved"
            )));
        }

        let record = ShortCodeRecord::new(code, long_url, Origin::Custom);

        let record = self
            .repository
            .insert_if_absent(record)
            .await
            .inspect_err(|e| debug!(alias, error = %e, "alias reservation failed"))?;

        info!(code = %record.code, "reserved custom alias");
        Ok(ShortenOutcome {
            record,
            reused: false,
        })
    }

    async fn allocate_generated(&self, long_url: String) -> Result<ShortenOutcome> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut storage_failures = 0;
        let mut last_storage_error: Option<StorageError> = None;

        for attempt in 1..=max_attempts {
            let code: ShortCode = self.generator.generate().into();
            let record = ShortCodeRecord::new(code, long_url.clone(), Origin::Generated);

            match self.repository.insert_if_absent(record).await {
                Ok(record) => {
                    debug!(code = %record.code, attempt, "allocated generated code");
                    return Ok(ShortenOutcome {
                        record,
                        reused: false,
                    });
                }
                Err(StorageError::Conflict(code)) => {
                    debug!(code = %code, attempt, "generated code collided, drawing again");
                    last_storage_error = None;
                }
                Err(e) if e.is_transient() && storage_failures < self.config.storage_retry_limit => {
                    storage_failures += 1;
                    warn!(error = %e, attempt, "storage failure, retrying with a fresh code");
                    last_storage_error = Some(e);
                }
                Err(e) => return Err(ShortenerError::StorageUnavailable(e.to_string())),
            }
        }

        if let Some(e) = last_storage_error {
            return Err(ShortenerError::StorageUnavailable(e.to_string()));
        }

        error!(
            attempts = max_attempts,
            "short code generation exhausted, code space saturated or generator broken"
        );
        Err(ShortenerError::GenerationExhausted {
            attempts: max_attempts,
        })
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortenOutcome> {
        let Some(deadline) = params.deadline else {
            return self.shorten_now(params).await;
        };

        tokio::time::timeout_at(deadline, self.shorten_now(params))
            .await
            .map_err(|_| {
                warn!("shorten deadline exceeded");
                ShortenerError::Timeout
            })?
    }
}
