//! Live auth provider client.

use crate::domain::auth::{AuthSession, AuthUser};
use crate::ports::auth::AuthPort;
use crate::ports::transport::{HttpTransport, OutboundRequest};
use async_trait::async_trait;
use http::Method;
use std::error::Error;
use std::sync::Arc;

pub struct LiveAuth {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    secret_key: String,
}

impl LiveAuth {
    pub fn new(transport: Arc<dyn HttpTransport>, api_url: &str, secret_key: &str) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            secret_key: secret_key.to_string(),
        }
    }

    fn request(&self, path: &str) -> OutboundRequest {
        OutboundRequest::new(Method::GET, format!("{}{}", self.api_url, path)).header(
            http::header::AUTHORIZATION,
            &format!("Bearer {}", self.secret_key),
        )
    }
}

#[async_trait]
impl AuthPort for LiveAuth {
    async fn auth(&self) -> Result<AuthSession, Box<dyn Error + Send + Sync>> {
        let resp = self.transport.send(self.request("/v1/session")).await?;
        Ok(resp.parse_json()?)
    }

    async fn current_user(&self) -> Result<AuthUser, Box<dyn Error + Send + Sync>> {
        let resp = self.transport.send(self.request("/v1/me")).await?;
        Ok(resp.parse_json()?)
    }
}
