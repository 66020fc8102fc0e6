//! Live media SDK client.

use crate::domain::media::{DirectUpload, MediaAsset};
use crate::ports::media::MediaSdkPort;
use crate::ports::transport::{HttpTransport, OutboundRequest};
use async_trait::async_trait;
use http::Method;
use serde_json::json;
use std::error::Error;
use std::sync::Arc;

pub struct LiveMediaSdk {
    transport: Arc<dyn HttpTransport>,
    api_url: String,
    api_key: String,
}

impl LiveMediaSdk {
    pub fn new(transport: Arc<dyn HttpTransport>, api_url: &str, api_key: &str) -> Self {
        Self {
            transport,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn request(&self, method: Method, path: &str) -> OutboundRequest {
        OutboundRequest::new(method, format!("{}{}", self.api_url, path)).header(
            http::header::AUTHORIZATION,
            &format!("Bearer {}", self.api_key),
        )
    }
}

#[async_trait]
impl MediaSdkPort for LiveMediaSdk {
    async fn create_asset(
        &self,
        input_url: &str,
    ) -> Result<MediaAsset, Box<dyn Error + Send + Sync>> {
        let req = self
            .request(Method::POST, "/video/v1/assets")
            .json(&json!({ "input": input_url }));
        let resp = self.transport.send(req).await?;
        Ok(resp.parse_json()?)
    }

    async fn get_asset(
        &self,
        asset_id: &str,
    ) -> Result<MediaAsset, Box<dyn Error + Send + Sync>> {
        let req = self.request(Method::GET, &format!("/video/v1/assets/{}", asset_id));
        let resp = self.transport.send(req).await?;
        Ok(resp.parse_json()?)
    }

    async fn delete_asset(&self, asset_id: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let req = self.request(Method::DELETE, &format!("/video/v1/assets/{}", asset_id));
        self.transport.send(req).await?;
        Ok(())
    }

    async fn create_direct_upload(&self) -> Result<DirectUpload, Box<dyn Error + Send + Sync>> {
        let req = self
            .request(Method::POST, "/video/v1/uploads")
            .json(&json!({ "new_asset_settings": { "playback_policy": ["public"] } }));
        let resp = self.transport.send(req).await?;
        Ok(resp.parse_json()?)
    }
}
