//! Serverless SQL-over-HTTP driver (the production database path).

use crate::ports::database::SqlDriver;
use crate::ports::transport::{HttpTransport, OutboundRequest};
use async_trait::async_trait;
use http::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    rows: Vec<Value>,
    #[serde(default)]
    row_count: u64,
}

pub struct ServerlessPostgres {
    transport: Arc<dyn HttpTransport>,
    endpoint: String,
}

impl ServerlessPostgres {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoint: &str) -> Self {
        Self {
            transport,
            endpoint: endpoint.to_string(),
        }
    }

    async fn run(&self, sql: &str) -> Result<QueryResponse, Box<dyn Error + Send + Sync>> {
        let req = OutboundRequest::new(Method::POST, self.endpoint.clone())
            .json(&json!({ "query": sql }));
        let resp = self.transport.send(req).await?;
        Ok(resp.parse_json()?)
    }
}

#[async_trait]
impl SqlDriver for ServerlessPostgres {
    async fn query(&self, sql: &str) -> Result<Vec<Value>, Box<dyn Error + Send + Sync>> {
        Ok(self.run(sql).await?.rows)
    }

    async fn execute(&self, sql: &str) -> Result<u64, Box<dyn Error + Send + Sync>> {
        Ok(self.run(sql).await?.row_count)
    }
}
