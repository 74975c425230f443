use crate::Result;
use async_trait::async_trait;
use burrow_core::ShortCode;
use tokio::time::Instant;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to its long URL, giving up at `deadline`.
    async fn resolve_within(&self, code: &ShortCode, deadline: Option<Instant>) -> Result<String>;

    /// Resolves a short code to its long URL.
    async fn resolve(&self, code: &ShortCode) -> Result<String> {
        self.resolve_within(code, None).await
    }
}
