//! HTTP inbound adapter.
//!
//! Serves the content host's API shape from the emulator, so tools that
//! point their SDK base URL at localhost get the same behavior as calls
//! caught by the outbound interceptor.

use super::video_host::EmulatedVideoHost;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::video::HostedVideo;

#[derive(Debug, Deserialize)]
pub struct CreateVideoBody {
    pub title: Option<String>,
}

/// Router exposing `/library/{libraryId}/videos[/{videoId}]`.
pub fn router(host: Arc<EmulatedVideoHost>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/library/:library_id/videos", post(create_video))
        .route(
            "/library/:library_id/videos/:video_id",
            get(get_video).put(upload_video).delete(delete_video),
        )
        .layer(cors)
        .with_state(host)
}

async fn create_video(
    State(host): State<Arc<EmulatedVideoHost>>,
    Path(_library_id): Path<String>,
    body: Option<Json<CreateVideoBody>>,
) -> Json<HostedVideo> {
    let title = body
        .and_then(|Json(body)| body.title)
        .unwrap_or_else(|| String::from("Untitled"));
    Json(host.create(&title))
}

async fn get_video(
    State(host): State<Arc<EmulatedVideoHost>>,
    Path((_library_id, video_id)): Path<(String, String)>,
) -> Json<HostedVideo> {
    Json(host.fetch(&video_id))
}

async fn upload_video(
    State(host): State<Arc<EmulatedVideoHost>>,
    Path((_library_id, video_id)): Path<(String, String)>,
    body: axum::body::Body,
) -> Json<Value> {
    // Drain the upload; the handler returns once the full body arrived,
    // so the record can go straight to finished.
    let mut stream = body.into_data_stream();
    let mut received = 0usize;
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => received += bytes.len(),
            Err(_) => break,
        }
    }
    println!("[EmuHost] HTTP upload of {} bytes for {}", received, video_id);
    host.complete_upload(&video_id);
    Json(json!({"success": true}))
}

async fn delete_video(
    State(host): State<Arc<EmulatedVideoHost>>,
    Path((_library_id, video_id)): Path<(String, String)>,
) -> Json<Value> {
    host.remove(&video_id);
    Json(json!({"success": true}))
}
