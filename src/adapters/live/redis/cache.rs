//! Redis CachePort implementation.
//!
//! Values are stored as JSON text so arbitrary structures survive the
//! round trip, matching what the application writes through the port.

use super::error::CacheError;
use super::pool::RedisPool;
use crate::ports::cache::{CachePort, SetOptions};
use async_trait::async_trait;
use deadpool_redis::redis::{cmd, AsyncCommands};
use serde_json::Value;
use std::collections::HashMap;

/// Decode a stored string: JSON when possible, raw string otherwise.
fn decode(raw: String) -> Value {
    serde_json::from_str(&raw).unwrap_or(Value::String(raw))
}

#[async_trait]
impl CachePort for RedisPool {
    async fn get(
        &self,
        key: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let raw: Option<String> = conn.get(key).await.map_err(CacheError::from)?;
        Ok(raw.map(decode))
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        opts: SetOptions,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let json = serde_json::to_string(&value)?;

        let mut command = cmd("SET");
        command.arg(key).arg(json);
        if let Some(px) = opts.px {
            command.arg("PX").arg(px);
        } else if let Some(ex) = opts.ex {
            command.arg("EX").arg(ex);
        }
        command
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(CacheError::from)?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let removed: u64 = conn.del(key).await.map_err(CacheError::from)?;
        Ok(removed)
    }

    async fn incr(&self, key: &str) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let count: i64 = conn.incr(key, 1i64).await.map_err(CacheError::from)?;
        Ok(count)
    }

    async fn expire(
        &self,
        key: &str,
        seconds: u64,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let applied: u64 = cmd("EXPIRE")
            .arg(key)
            .arg(seconds)
            .query_async(&mut conn)
            .await
            .map_err(CacheError::from)?;
        Ok(applied)
    }

    async fn ttl(&self, key: &str) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let remaining: i64 = conn.ttl(key).await.map_err(CacheError::from)?;
        Ok(remaining)
    }

    async fn hget(
        &self,
        key: &str,
        field: &str,
    ) -> Result<Option<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let raw: Option<String> = conn.hget(key, field).await.map_err(CacheError::from)?;
        Ok(raw.map(decode))
    }

    async fn hset(
        &self,
        key: &str,
        fields: HashMap<String, Value>,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let mut pairs = Vec::with_capacity(fields.len());
        for (field, value) in &fields {
            pairs.push((field.clone(), serde_json::to_string(value)?));
        }
        let written = pairs.len() as u64;
        conn.hset_multiple::<_, _, _, ()>(key, &pairs)
            .await
            .map_err(CacheError::from)?;
        Ok(written)
    }

    async fn sadd(
        &self,
        key: &str,
        members: Vec<Value>,
    ) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let mut encoded = Vec::with_capacity(members.len());
        for member in &members {
            encoded.push(serde_json::to_string(member)?);
        }
        let added: u64 = conn.sadd(key, encoded).await.map_err(CacheError::from)?;
        Ok(added)
    }

    async fn smembers(
        &self,
        key: &str,
    ) -> Result<Vec<Value>, Box<dyn std::error::Error + Send + Sync>> {
        let mut conn = self.pool.get().await.map_err(CacheError::from)?;
        let raw: Vec<String> = conn.smembers(key).await.map_err(CacheError::from)?;
        Ok(raw.into_iter().map(decode).collect())
    }
}
