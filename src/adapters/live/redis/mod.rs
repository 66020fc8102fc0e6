//! Redis adapter for live deployment.
//!
//! Provides Redis-backed implementations of:
//! - `CachePort` for general caching
//! - `RateLimiterPort` for fixed-window request accounting

mod cache;
mod error;
mod pool;
mod rate_limit;

pub use error::CacheError;
pub use pool::RedisPool;
pub use rate_limit::RedisRateLimiter;

/// Key prefix for rate-limit counters
const RATE_LIMIT_PREFIX: &str = "ratelimit:";
