//! Rate-limit emulator. Local development should never be throttled, so
//! every check passes without any actual accounting.

use crate::domain::rate_limit::RateLimitDecision;
use crate::domain::video::now_ms;
use crate::ports::rate_limit::RateLimiterPort;
use async_trait::async_trait;
use std::error::Error;
use std::time::Duration;

const LIMIT: u64 = 1000;
const REMAINING: u64 = 999;
const WINDOW_MS: u64 = 60_000;

/// Windowing algorithms the production limiter can be configured with.
/// Kept for call-site parity; the emulator ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimiterAlgorithm {
    SlidingWindow,
    FixedWindow,
    TokenBucket,
}

/// Limiter that grants every request.
#[derive(Debug, Clone, Copy)]
pub struct AlwaysAllowLimiter {
    algorithm: LimiterAlgorithm,
}

impl AlwaysAllowLimiter {
    pub fn sliding_window(_requests: u64, _window: Duration) -> Self {
        Self {
            algorithm: LimiterAlgorithm::SlidingWindow,
        }
    }

    pub fn fixed_window(_requests: u64, _window: Duration) -> Self {
        Self {
            algorithm: LimiterAlgorithm::FixedWindow,
        }
    }

    pub fn token_bucket(_tokens: u64, _interval: Duration, _max_tokens: u64) -> Self {
        Self {
            algorithm: LimiterAlgorithm::TokenBucket,
        }
    }

    pub fn algorithm(&self) -> LimiterAlgorithm {
        self.algorithm
    }

    fn decision() -> RateLimitDecision {
        RateLimitDecision {
            allowed: true,
            limit: LIMIT,
            remaining: REMAINING,
            reset_at: now_ms() + WINDOW_MS,
        }
    }
}

impl Default for AlwaysAllowLimiter {
    fn default() -> Self {
        Self::sliding_window(LIMIT, Duration::from_secs(60))
    }
}

#[async_trait]
impl RateLimiterPort for AlwaysAllowLimiter {
    async fn limit(
        &self,
        _identifier: &str,
    ) -> Result<RateLimitDecision, Box<dyn Error + Send + Sync>> {
        Ok(Self::decision())
    }

    async fn block_until_ready(
        &self,
        _identifier: &str,
        _timeout: Duration,
    ) -> Result<RateLimitDecision, Box<dyn Error + Send + Sync>> {
        Ok(Self::decision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_any_identifier_at_any_volume() {
        let limiter = AlwaysAllowLimiter::default();
        for i in 0..200 {
            let decision = limiter.limit(&format!("caller-{}", i % 3)).await.unwrap();
            assert!(decision.allowed);
            assert_eq!(decision.limit, 1000);
            assert_eq!(decision.remaining, 999);
            assert!(decision.reset_at > now_ms());
        }
    }

    #[tokio::test]
    async fn block_until_ready_never_blocks() {
        let limiter = AlwaysAllowLimiter::token_bucket(10, Duration::from_secs(1), 10);
        let decision = limiter
            .block_until_ready("anyone", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(decision.allowed);
    }
}
