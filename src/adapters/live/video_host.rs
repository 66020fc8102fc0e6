//! Live content-host client.
//!
//! Issues the host's documented video API calls through the shared
//! transport, so an installed interceptor sees exactly the same traffic
//! an SDK would produce.

use crate::domain::video::HostedVideo;
use crate::ports::transport::{HttpTransport, OutboundRequest};
use crate::ports::video_host::{MediaStream, VideoHostPort};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use http::{HeaderName, Method, StatusCode};
use serde_json::json;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// API-key header the host expects.
const ACCESS_KEY_HEADER: HeaderName = HeaderName::from_static("accesskey");

#[derive(Debug)]
pub enum HostApiError {
    Status(StatusCode),
    Decode(serde_json::Error),
}

impl fmt::Display for HostApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostApiError::Status(status) => write!(f, "host API returned {}", status),
            HostApiError::Decode(e) => write!(f, "host API response decode error: {}", e),
        }
    }
}

impl std::error::Error for HostApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostApiError::Status(_) => None,
            HostApiError::Decode(e) => Some(e),
        }
    }
}

impl From<serde_json::Error> for HostApiError {
    fn from(err: serde_json::Error) -> Self {
        HostApiError::Decode(err)
    }
}

pub struct LiveVideoHost {
    transport: Arc<dyn HttpTransport>,
    api_host: String,
    api_key: String,
}

impl LiveVideoHost {
    pub fn new(transport: Arc<dyn HttpTransport>, api_host: &str, api_key: &str) -> Self {
        Self {
            transport,
            api_host: api_host.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, library_id: &str, video_id: Option<&str>) -> String {
        match video_id {
            Some(video_id) => format!(
                "https://{}/library/{}/videos/{}",
                self.api_host, library_id, video_id
            ),
            None => format!("https://{}/library/{}/videos", self.api_host, library_id),
        }
    }

    fn request(&self, method: Method, url: String) -> OutboundRequest {
        OutboundRequest::new(method, url).header(ACCESS_KEY_HEADER, &self.api_key)
    }
}

#[async_trait]
impl VideoHostPort for LiveVideoHost {
    async fn create_video(
        &self,
        library_id: &str,
        title: &str,
    ) -> Result<HostedVideo, Box<dyn Error + Send + Sync>> {
        let req = self
            .request(Method::POST, self.url(library_id, None))
            .json(&json!({ "title": title }));
        let resp = self.transport.send(req).await?;
        if !resp.status.is_success() {
            return Err(Box::new(HostApiError::Status(resp.status)));
        }
        Ok(resp.parse_json().map_err(HostApiError::from)?)
    }

    async fn get_video(
        &self,
        library_id: &str,
        video_id: &str,
    ) -> Result<HostedVideo, Box<dyn Error + Send + Sync>> {
        let req = self.request(Method::GET, self.url(library_id, Some(video_id)));
        let resp = self.transport.send(req).await?;
        if !resp.status.is_success() {
            return Err(Box::new(HostApiError::Status(resp.status)));
        }
        Ok(resp.parse_json().map_err(HostApiError::from)?)
    }

    async fn upload_video(
        &self,
        library_id: &str,
        video_id: &str,
        mut media: MediaStream,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // The transport takes a complete body, so buffer the stream.
        let mut buffer = BytesMut::new();
        while let Some(chunk) = media.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        let req = self
            .request(Method::PUT, self.url(library_id, Some(video_id)))
            .body(Bytes::from(buffer));
        let resp = self.transport.send(req).await?;
        if !resp.status.is_success() {
            return Err(Box::new(HostApiError::Status(resp.status)));
        }
        Ok(())
    }

    async fn delete_video(
        &self,
        library_id: &str,
        video_id: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let req = self.request(Method::DELETE, self.url(library_id, Some(video_id)));
        let resp = self.transport.send(req).await?;
        if !resp.status.is_success() {
            return Err(Box::new(HostApiError::Status(resp.status)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::emulated::interceptor::InterceptTransport;
    use crate::adapters::emulated::store::SnapshotStore;
    use crate::adapters::emulated::video_host::EmulatedVideoHost;
    use crate::domain::video::VideoState;
    use crate::ports::transport::OutboundResponse;
    use mockall::mock;
    use tempfile::tempdir;

    mock! {
        pub Transport {}

        #[async_trait]
        impl HttpTransport for Transport {
            async fn send(
                &self,
                req: OutboundRequest,
            ) -> Result<OutboundResponse, Box<dyn Error + Send + Sync>>;
        }
    }

    #[tokio::test]
    async fn the_sdk_path_and_the_interceptor_agree() {
        // Wire the live client through an intercepting transport: the
        // same behavior an SDK gets when emulation is on.
        let dir = tempdir().unwrap();
        let store = Arc::new(SnapshotStore::open(dir.path().join("videos.json")));
        let emulated = Arc::new(EmulatedVideoHost::new(store));
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let gateway = Arc::new(InterceptTransport::new(
            Arc::new(inner),
            emulated.clone(),
            "video.bunnycdn.com",
        ));

        let client = LiveVideoHost::new(gateway, "video.bunnycdn.com", "key");
        let created = client.create_video("42", "Through the SDK").await.unwrap();
        assert_eq!(created.status, VideoState::Queued);
        assert_eq!(emulated.fetch(&created.guid).title, "Through the SDK");

        let fetched = client.get_video("42", &created.guid).await.unwrap();
        assert_eq!(fetched.guid, created.guid);

        client.delete_video("42", &created.guid).await.unwrap();
        assert!(emulated.is_empty());
    }

    #[tokio::test]
    async fn non_success_statuses_surface_as_errors() {
        let mut inner = MockTransport::new();
        inner.expect_send().times(1).returning(|_| {
            Ok(OutboundResponse::json(
                StatusCode::NOT_FOUND,
                &json!({"error": "missing"}),
            ))
        });
        let client = LiveVideoHost::new(Arc::new(inner), "video.bunnycdn.com", "key");

        let err = client.get_video("42", "gone").await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
