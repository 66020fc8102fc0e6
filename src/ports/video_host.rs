use crate::domain::video::HostedVideo;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::error::Error;
use std::pin::Pin;

/// Streamed upload body handed to the host.
pub type MediaStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

#[async_trait]
pub trait VideoHostPort: Send + Sync {
    /// Register a new video in a library. The returned record is queued
    /// with no media dimensions.
    async fn create_video(
        &self,
        library_id: &str,
        title: &str,
    ) -> Result<HostedVideo, Box<dyn Error + Send + Sync>>;

    /// Fetch a video. Unknown ids resolve to a stable finished-looking
    /// record rather than an error.
    async fn get_video(
        &self,
        library_id: &str,
        video_id: &str,
    ) -> Result<HostedVideo, Box<dyn Error + Send + Sync>>;

    /// Upload media for a video; the host transcodes asynchronously.
    async fn upload_video(
        &self,
        library_id: &str,
        video_id: &str,
        media: MediaStream,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Delete a video. Acks whether or not the id existed.
    async fn delete_video(
        &self,
        library_id: &str,
        video_id: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
