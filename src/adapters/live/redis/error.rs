//! Error types for the live Redis adapter.

use deadpool_redis::CreatePoolError;
use std::fmt;

pub type RedisError = deadpool_redis::redis::RedisError;
pub type PoolError = deadpool_redis::PoolError;

#[derive(Debug)]
pub enum CacheError {
    Command(RedisError),
    Pool(PoolError),
    Decode(serde_json::Error),
    CreatePool(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::Command(e) => write!(f, "redis command failed: {}", e),
            CacheError::Pool(e) => write!(f, "redis pool error: {}", e),
            CacheError::Decode(e) => write!(f, "cached value decode error: {}", e),
            CacheError::CreatePool(e) => write!(f, "redis pool creation failed: {}", e),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Command(e) => Some(e),
            CacheError::Pool(e) => Some(e),
            CacheError::Decode(e) => Some(e),
            CacheError::CreatePool(_) => None,
        }
    }
}

impl From<RedisError> for CacheError {
    fn from(err: RedisError) -> Self {
        CacheError::Command(err)
    }
}

impl From<PoolError> for CacheError {
    fn from(err: PoolError) -> Self {
        CacheError::Pool(err)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Decode(err)
    }
}

impl From<CreatePoolError> for CacheError {
    fn from(err: CreatePoolError) -> Self {
        CacheError::CreatePool(format!("{}", err))
    }
}
