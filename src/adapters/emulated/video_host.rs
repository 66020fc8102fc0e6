//! Content-host emulator: per-video lifecycle with simulated transcoding.
//!
//! Videos live in their own snapshot store keyed by guid. An upload flips
//! the record to Processing and schedules a deferred transition to
//! Finished, modeling the real host's background encode pipeline.

use super::store::SnapshotStore;
use crate::domain::video::{HostedVideo, VideoState};
use crate::ports::cache::SetOptions;
use crate::ports::video_host::{MediaStream, VideoHostPort};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Fixed delay between an upload and the simulated transcode completing.
pub const TRANSCODE_DELAY: Duration = Duration::from_secs(2);

/// Offline stand-in for the video host's API.
pub struct EmulatedVideoHost {
    videos: Arc<SnapshotStore>,
    /// Deferred transcode tasks, keyed by video guid so a delete can
    /// cancel the pending transition.
    pending: Arc<Mutex<HashMap<String, CancellationToken>>>,
    transcode_delay: Duration,
}

impl EmulatedVideoHost {
    pub fn new(videos: Arc<SnapshotStore>) -> Self {
        Self {
            videos,
            pending: Arc::new(Mutex::new(HashMap::new())),
            transcode_delay: TRANSCODE_DELAY,
        }
    }

    /// Shorten the simulated transcode, mainly for tests.
    pub fn with_transcode_delay(mut self, delay: Duration) -> Self {
        self.transcode_delay = delay;
        self
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<String, CancellationToken>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self, video_id: &str) -> Option<HostedVideo> {
        self.videos
            .get(video_id)
            .and_then(|value| serde_json::from_value(value).ok())
    }

    fn write(&self, video: &HostedVideo) {
        if let Ok(value) = serde_json::to_value(video) {
            self.videos.set(&video.guid, value, SetOptions::default());
        }
    }

    /// Register a new queued video and persist it.
    pub fn create(&self, title: &str) -> HostedVideo {
        let guid = Uuid::new_v4().to_string();
        let video = HostedVideo::queued(guid, title.to_string());
        self.write(&video);
        println!("[EmuHost] created video {} ({:?})", video.guid, video.title);
        video
    }

    /// Fetch a video, synthesizing a finished placeholder for ids the
    /// host has never seen.
    pub fn fetch(&self, video_id: &str) -> HostedVideo {
        self.read(video_id)
            .unwrap_or_else(|| HostedVideo::placeholder(video_id.to_string()))
    }

    /// Remove a video, cancelling any pending transcode. Returns whether
    /// a record actually existed.
    pub fn remove(&self, video_id: &str) -> bool {
        if let Some(token) = self.pending().remove(video_id) {
            token.cancel();
        }
        let removed = self.videos.del(video_id) == 1;
        if removed {
            println!("[EmuHost] deleted video {}", video_id);
        }
        removed
    }

    /// Mark a video Processing and schedule the deferred transition to
    /// Finished. Uploading again restarts the clock.
    pub fn begin_upload(&self, video_id: &str) {
        if let Some(mut video) = self.read(video_id) {
            video.status = VideoState::Processing;
            self.write(&video);
        }

        let token = CancellationToken::new();
        if let Some(previous) = self
            .pending()
            .insert(video_id.to_string(), token.clone())
        {
            previous.cancel();
        }

        let videos = self.videos.clone();
        let pending = self.pending.clone();
        let delay = self.transcode_delay;
        let guid = video_id.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    finish_transcode(&videos, &guid);
                    pending
                        .lock()
                        .unwrap_or_else(|e| e.into_inner())
                        .remove(&guid);
                }
            }
        });
    }

    /// Mark an upload finished right away. Wire-level uploads arrive with
    /// the full body, so the interceptor path models a completed
    /// multipart upload rather than a background job.
    pub fn complete_upload(&self, video_id: &str) {
        if let Some(token) = self.pending().remove(video_id) {
            token.cancel();
        }
        if let Some(mut video) = self.read(video_id) {
            video.mark_finished();
            self.write(&video);
            println!("[EmuHost] upload complete for {}", video_id);
        }
    }

    /// Number of videos currently tracked.
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// Deferred transcode handler. The video may have been deleted while the
/// timer was pending; a missing record is a no-op, never a recreate.
fn finish_transcode(videos: &SnapshotStore, guid: &str) {
    let Some(value) = videos.get(guid) else {
        return;
    };
    let Ok(mut video) = serde_json::from_value::<HostedVideo>(value) else {
        return;
    };
    video.mark_finished();
    if let Ok(value) = serde_json::to_value(&video) {
        videos.set(guid, value, SetOptions::default());
    }
    println!("[EmuHost] transcode finished for {}", guid);
}

#[async_trait]
impl VideoHostPort for EmulatedVideoHost {
    async fn create_video(
        &self,
        _library_id: &str,
        title: &str,
    ) -> Result<HostedVideo, Box<dyn Error + Send + Sync>> {
        Ok(self.create(title))
    }

    async fn get_video(
        &self,
        _library_id: &str,
        video_id: &str,
    ) -> Result<HostedVideo, Box<dyn Error + Send + Sync>> {
        Ok(self.fetch(video_id))
    }

    async fn upload_video(
        &self,
        _library_id: &str,
        video_id: &str,
        mut media: MediaStream,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        // Drain the body like the real host would; the bytes themselves
        // are irrelevant to the emulation.
        let mut received = 0usize;
        while let Some(chunk) = media.next().await {
            received += chunk?.len();
        }
        println!("[EmuHost] received {} bytes for {}", received, video_id);
        self.begin_upload(video_id);
        Ok(())
    }

    async fn delete_video(
        &self,
        _library_id: &str,
        video_id: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.remove(video_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{FINISHED_HEIGHT, FINISHED_LENGTH_SECS, FINISHED_WIDTH};
    use bytes::Bytes;
    use tempfile::tempdir;

    fn host(dir: &tempfile::TempDir) -> EmulatedVideoHost {
        let store = Arc::new(SnapshotStore::open(dir.path().join("videos.json")));
        EmulatedVideoHost::new(store)
    }

    fn media_stream() -> MediaStream {
        Box::pin(futures::stream::iter(vec![Ok(Bytes::from_static(b"data"))]))
    }

    #[tokio::test]
    async fn create_starts_queued_with_zero_dimensions() {
        let dir = tempdir().unwrap();
        let host = host(&dir);

        let video = host.create_video("lib", "First upload").await.unwrap();
        assert_eq!(video.status, VideoState::Queued);
        assert_eq!(video.title, "First upload");
        assert_eq!((video.length, video.width, video.height), (0, 0, 0));
        assert!(!video.guid.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn upload_processes_then_finishes_after_the_delay() {
        let dir = tempdir().unwrap();
        let host = host(&dir);
        let video = host.create("clip");

        host.upload_video("lib", &video.guid, media_stream())
            .await
            .unwrap();
        assert_eq!(host.fetch(&video.guid).status, VideoState::Processing);

        tokio::time::sleep(TRANSCODE_DELAY + Duration::from_millis(100)).await;

        let finished = host.fetch(&video.guid);
        assert_eq!(finished.status, VideoState::Finished);
        assert_eq!(finished.length, FINISHED_LENGTH_SECS);
        assert_eq!(finished.width, FINISHED_WIDTH);
        assert_eq!(finished.height, FINISHED_HEIGHT);
    }

    #[tokio::test]
    async fn unknown_ids_get_a_stable_finished_placeholder() {
        let dir = tempdir().unwrap();
        let host = host(&dir);

        let video = host.get_video("lib", "never-created-id").await.unwrap();
        assert_eq!(video.guid, "never-created-id");
        assert_eq!(video.status, VideoState::Finished);
        assert!(video.width > 0 && video.height > 0 && video.length > 0);
        // The placeholder is synthesized, not stored.
        assert!(host.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deleting_before_the_timer_fires_does_not_resurrect_the_video() {
        let dir = tempdir().unwrap();
        let host = host(&dir);
        let video = host.create("doomed");

        host.begin_upload(&video.guid);
        host.delete_video("lib", &video.guid).await.unwrap();

        tokio::time::sleep(TRANSCODE_DELAY + Duration::from_millis(100)).await;
        assert!(host.is_empty(), "timer handler must no-op on a deleted video");
    }

    #[tokio::test]
    async fn wire_uploads_finish_immediately() {
        let dir = tempdir().unwrap();
        let host = host(&dir);
        let video = host.create("direct");

        host.complete_upload(&video.guid);
        assert_eq!(host.fetch(&video.guid).status, VideoState::Finished);
    }

    #[tokio::test]
    async fn created_videos_survive_a_simulated_restart() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("videos.json");

        let guid = {
            let store = Arc::new(SnapshotStore::open(&path));
            let host = EmulatedVideoHost::new(store);
            host.create("persisted").guid
        };

        let store = Arc::new(SnapshotStore::open(&path));
        let host = EmulatedVideoHost::new(store);
        let video = host.fetch(&guid);
        assert_eq!(video.title, "persisted");
        assert_eq!(video.status, VideoState::Queued);
    }

    #[tokio::test]
    async fn delete_acks_for_unknown_ids_too() {
        let dir = tempdir().unwrap();
        let host = host(&dir);
        // Port contract: never an error, regardless of existence.
        host.delete_video("lib", "ghost").await.unwrap();
        assert!(!host.remove("ghost"));
    }
}
