use typed_builder::TypedBuilder;

/// Tuning knobs for [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerConfig {
    /// Generated candidates tried per request before giving up.
    #[builder(default = 5)]
    pub max_attempts: u32,
    /// Transient storage failures tolerated per request on the generated
    /// path. Each one uses up an attempt.
    #[builder(default = 1)]
    pub storage_retry_limit: u32,
    /// Return the existing record when the long URL was shortened before.
    #[builder(default = false)]
    pub reuse_existing: bool,
    /// Host of this service. Long URLs pointing at it are rejected.
    #[builder(default, setter(strip_option, into))]
    pub public_host: Option<String>,
    /// Extra path segments aliases may not take, e.g. a single-segment
    /// create route. Compared case-insensitively.
    #[builder(default)]
    pub reserved_aliases: Vec<String>,
}

impl Default for ShortenerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
