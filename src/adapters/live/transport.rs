//! Pass-through HTTP transport backed by reqwest.

use crate::ports::transport::{HttpTransport, OutboundRequest, OutboundResponse};
use async_trait::async_trait;
use std::error::Error;

#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        req: OutboundRequest,
    ) -> Result<OutboundResponse, Box<dyn Error + Send + Sync>> {
        let mut builder = self
            .client
            .request(req.method, &req.url)
            .headers(req.headers);
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(OutboundResponse {
            status,
            headers,
            body,
        })
    }
}
