//! Outbound-call gateway.
//!
//! Wraps the transport so any request aimed at the content host's API is
//! answered from the emulator instead of the network. Everything else
//! passes through to the inner transport untouched. Installed at most
//! once per process, and only when the emulation switch is on.

use super::video_host::EmulatedVideoHost;
use crate::domain::video::HostedVideo;
use crate::ports::transport::{HttpTransport, OutboundRequest, OutboundResponse};
use async_trait::async_trait;
use http::{Method, StatusCode};
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::error::Error;
use std::sync::{Arc, OnceLock};

/// Path shape of the content host's video API:
/// `.../library/{libraryId}/videos(/{videoId})?`
const VIDEO_PATH_PATTERN: &str = r"library/([^/]+)/videos(?:/([^/?]+))?";

static GATEWAY: OnceLock<Arc<InterceptTransport>> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct CreateBody {
    title: Option<String>,
}

/// Transport wrapper that serves content-host API calls locally.
pub struct InterceptTransport {
    inner: Arc<dyn HttpTransport>,
    host: Arc<EmulatedVideoHost>,
    api_host: String,
    pattern: Regex,
}

impl InterceptTransport {
    pub fn new(
        inner: Arc<dyn HttpTransport>,
        host: Arc<EmulatedVideoHost>,
        api_host: &str,
    ) -> Self {
        Self {
            inner,
            host,
            api_host: api_host.to_string(),
            // The pattern is a literal; it cannot fail to compile.
            pattern: Regex::new(VIDEO_PATH_PATTERN).expect("video path pattern"),
        }
    }

    /// Answer a matched request from the emulator.
    fn dispatch(&self, req: &OutboundRequest, video_id: Option<&str>) -> OutboundResponse {
        println!(
            "[Interceptor] answering {} {} locally",
            req.method, req.url
        );

        match (&req.method, video_id) {
            (&Method::POST, None) => {
                let title = req
                    .body
                    .as_deref()
                    .and_then(|body| serde_json::from_slice::<CreateBody>(body).ok())
                    .and_then(|body| body.title)
                    .unwrap_or_else(|| String::from("Untitled"));
                let video = self.host.create(&title);
                OutboundResponse::json(StatusCode::OK, &video)
            }
            (&Method::GET, Some(id)) => {
                let video: HostedVideo = self.host.fetch(id);
                OutboundResponse::json(StatusCode::OK, &video)
            }
            (&Method::PUT, Some(id)) => {
                // A wire-level PUT carries the whole body, so the upload
                // is complete by the time it reaches us.
                self.host.complete_upload(id);
                OutboundResponse::json(StatusCode::OK, &json!({"success": true}))
            }
            (&Method::DELETE, Some(id)) => {
                self.host.remove(id);
                OutboundResponse::json(StatusCode::OK, &json!({"success": true}))
            }
            // Unanticipated shapes must not break local development.
            _ => OutboundResponse::json(StatusCode::OK, &json!({"success": true})),
        }
    }
}

#[async_trait]
impl HttpTransport for InterceptTransport {
    async fn send(
        &self,
        req: OutboundRequest,
    ) -> Result<OutboundResponse, Box<dyn Error + Send + Sync>> {
        if req.url.contains(&self.api_host) {
            let video_id = self
                .pattern
                .captures(&req.url)
                .map(|captures| captures.get(2).map(|m| m.as_str().to_string()));
            if let Some(video_id) = video_id {
                return Ok(self.dispatch(&req, video_id.as_deref()));
            }
            // Matching host but unrecognized path: generic ack.
            return Ok(OutboundResponse::json(
                StatusCode::OK,
                &json!({"success": true}),
            ));
        }
        self.inner.send(req).await
    }
}

/// Install the gateway process-wide. Installing twice is a no-op that
/// returns the already-installed gateway, so double wiring cannot stack
/// interceptors.
pub fn install(
    inner: Arc<dyn HttpTransport>,
    host: Arc<EmulatedVideoHost>,
    api_host: &str,
) -> Arc<InterceptTransport> {
    let mut fresh = false;
    let gateway = GATEWAY.get_or_init(|| {
        fresh = true;
        Arc::new(InterceptTransport::new(inner, host, api_host))
    });
    if fresh {
        println!("[Interceptor] outbound gateway installed for {}", api_host);
    }
    gateway.clone()
}

/// The installed gateway, if any.
pub fn installed() -> Option<Arc<InterceptTransport>> {
    GATEWAY.get().cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::emulated::store::SnapshotStore;
    use crate::domain::video::VideoState;
    use bytes::Bytes;
    use mockall::mock;
    use mockall::predicate::always;
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

    const API_HOST: &str = "video.bunnycdn.com";

    fn emulated_host(dir: &tempfile::TempDir) -> Arc<EmulatedVideoHost> {
        let store = Arc::new(SnapshotStore::open(dir.path().join("videos.json")));
        Arc::new(EmulatedVideoHost::new(store))
    }

    fn gateway(dir: &tempfile::TempDir, inner: MockTransport) -> (InterceptTransport, Arc<EmulatedVideoHost>) {
        let host = emulated_host(dir);
        (
            InterceptTransport::new(Arc::new(inner), host.clone(), API_HOST),
            host,
        )
    }

    fn video_url(id: Option<&str>) -> String {
        match id {
            Some(id) => format!("https://{}/library/42/videos/{}", API_HOST, id),
            None => format!("https://{}/library/42/videos", API_HOST),
        }
    }

    #[tokio::test]
    async fn post_without_id_creates_a_video_locally() {
        let dir = tempdir().unwrap();
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let (gateway, host) = gateway(&dir, inner);

        let req = OutboundRequest::new(Method::POST, video_url(None))
            .body(Bytes::from(r#"{"title":"From the wire"}"#));
        let resp = gateway.send(req).await.unwrap();

        let video: HostedVideo = resp.parse_json().unwrap();
        assert_eq!(video.title, "From the wire");
        assert_eq!(video.status, VideoState::Queued);
        // Same record the direct create path would have produced.
        assert_eq!(host.fetch(&video.guid).title, "From the wire");
    }

    #[tokio::test]
    async fn get_with_unknown_id_returns_the_placeholder() {
        let dir = tempdir().unwrap();
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let (gateway, _host) = gateway(&dir, inner);

        let req = OutboundRequest::new(Method::GET, video_url(Some("nope")));
        let resp = gateway.send(req).await.unwrap();

        let video: HostedVideo = resp.parse_json().unwrap();
        assert_eq!(video.guid, "nope");
        assert_eq!(video.status, VideoState::Finished);
    }

    #[tokio::test]
    async fn put_with_id_marks_the_upload_finished_immediately() {
        let dir = tempdir().unwrap();
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let (gateway, host) = gateway(&dir, inner);
        let video = host.create("wire upload");

        let req = OutboundRequest::new(Method::PUT, video_url(Some(&video.guid)))
            .body(Bytes::from_static(b"mp4 bytes"));
        let resp = gateway.send(req).await.unwrap();

        let ack: serde_json::Value = resp.parse_json().unwrap();
        assert_eq!(ack["success"], true);
        assert_eq!(host.fetch(&video.guid).status, VideoState::Finished);
    }

    #[tokio::test]
    async fn delete_with_id_removes_the_record() {
        let dir = tempdir().unwrap();
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let (gateway, host) = gateway(&dir, inner);
        let video = host.create("short-lived");

        let req = OutboundRequest::new(Method::DELETE, video_url(Some(&video.guid)));
        gateway.send(req).await.unwrap();

        assert!(host.is_empty());
    }

    #[tokio::test]
    async fn unrecognized_shapes_on_the_host_get_a_generic_ack() {
        let dir = tempdir().unwrap();
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let (gateway, _host) = gateway(&dir, inner);

        let req = OutboundRequest::new(
            Method::GET,
            format!("https://{}/library/42/statistics", API_HOST),
        );
        let resp = gateway.send(req).await.unwrap();
        let ack: serde_json::Value = resp.parse_json().unwrap();
        assert_eq!(ack["success"], true);
    }

    #[tokio::test]
    async fn non_matching_urls_pass_through_to_the_inner_transport() {
        let dir = tempdir().unwrap();
        let mut inner = MockTransport::new();
        inner
            .expect_send()
            .with(always())
            .times(1)
            .returning(|_| {
                Ok(OutboundResponse::json(
                    StatusCode::OK,
                    &json!({"passed": "through"}),
                ))
            });
        let (gateway, _host) = gateway(&dir, inner);

        let req = OutboundRequest::new(Method::GET, "https://api.example.com/health");
        let resp = gateway.send(req).await.unwrap();

        let body: serde_json::Value = resp.parse_json().unwrap();
        assert_eq!(body["passed"], "through");
    }

    #[tokio::test]
    async fn install_is_idempotent() {
        let dir = tempdir().unwrap();
        let host = emulated_host(&dir);
        let mut inner = MockTransport::new();
        inner.expect_send().times(0);
        let inner: Arc<dyn HttpTransport> = Arc::new(inner);

        let first = install(inner.clone(), host.clone(), API_HOST);
        let second = install(inner, host, API_HOST);
        assert!(Arc::ptr_eq(&first, &second), "no double-wrapping");
        assert!(installed().is_some());
    }
}
