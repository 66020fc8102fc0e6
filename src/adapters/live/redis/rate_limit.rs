//! Redis RateLimiterPort implementation: fixed-window counters.

use super::error::CacheError;
use super::pool::RedisPool;
use super::RATE_LIMIT_PREFIX;
use crate::domain::rate_limit::RateLimitDecision;
use crate::domain::video::now_ms;
use crate::ports::rate_limit::RateLimiterPort;
use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use std::time::Duration;

/// Fixed-window limiter backed by INCR + EXPIRE.
#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: RedisPool,
    limit: u64,
    window: Duration,
}

impl RedisRateLimiter {
    pub fn new(pool: RedisPool, limit: u64, window: Duration) -> Self {
        Self {
            pool,
            limit,
            window,
        }
    }

    async fn check(&self, identifier: &str) -> Result<RateLimitDecision, CacheError> {
        let mut conn = self.pool.pool.get().await?;
        let window_secs = self.window.as_secs().max(1);
        let bucket = now_ms() / (window_secs * 1000);
        let key = format!("{}{}:{}", RATE_LIMIT_PREFIX, identifier, bucket);

        let count: u64 = conn.incr(&key, 1u64).await?;
        if count == 1 {
            // First hit in this window: bound the counter's lifetime.
            conn.expire::<_, i64>(&key, window_secs as i64).await?;
        }

        Ok(RateLimitDecision {
            allowed: count <= self.limit,
            limit: self.limit,
            remaining: self.limit.saturating_sub(count),
            reset_at: (bucket + 1) * window_secs * 1000,
        })
    }
}

#[async_trait]
impl RateLimiterPort for RedisRateLimiter {
    async fn limit(
        &self,
        identifier: &str,
    ) -> Result<RateLimitDecision, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.check(identifier).await?)
    }

    async fn block_until_ready(
        &self,
        identifier: &str,
        timeout: Duration,
    ) -> Result<RateLimitDecision, Box<dyn std::error::Error + Send + Sync>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let decision = self.check(identifier).await?;
            if decision.allowed || tokio::time::Instant::now() >= deadline {
                return Ok(decision);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }
}
