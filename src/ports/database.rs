use async_trait::async_trait;
use serde_json::Value;
use std::error::Error;

/// Minimal SQL driver contract shared by the serverless driver and its
/// local substitution. Rows come back as JSON objects keyed by column
/// name.
#[async_trait]
pub trait SqlDriver: Send + Sync {
    /// Run a statement that returns rows.
    async fn query(&self, sql: &str) -> Result<Vec<Value>, Box<dyn Error + Send + Sync>>;

    /// Run a statement and return the affected-row count.
    async fn execute(&self, sql: &str) -> Result<u64, Box<dyn Error + Send + Sync>>;
}
