use std::sync::Arc;
use std::time::Duration;

use burrow_core::Shortener;
use burrow_redirector::Redirector;
use tokio::time::Instant;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
    public_base_url: Arc<str>,
    request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        public_base_url: impl AsRef<str>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            public_base_url: Arc::from(public_base_url.as_ref().trim_end_matches('/')),
            request_timeout: None,
        }
    }

    /// Bound every request by `timeout`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Deadline for a request starting now.
    pub fn deadline(&self) -> Option<Instant> {
        self.request_timeout.map(|timeout| Instant::now() + timeout)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("public_base_url", &self.public_base_url)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
