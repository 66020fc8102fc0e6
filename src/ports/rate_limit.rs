use crate::domain::rate_limit::RateLimitDecision;
use async_trait::async_trait;
use std::error::Error;
use std::time::Duration;

#[async_trait]
pub trait RateLimiterPort: Send + Sync {
    /// Check whether a request for `identifier` may proceed.
    async fn limit(
        &self,
        identifier: &str,
    ) -> Result<RateLimitDecision, Box<dyn Error + Send + Sync>>;

    /// Wait up to `timeout` for capacity, then decide.
    async fn block_until_ready(
        &self,
        identifier: &str,
        timeout: Duration,
    ) -> Result<RateLimitDecision, Box<dyn Error + Send + Sync>>;
}
