use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Length (seconds) reported for a video once its transcode completes.
pub const FINISHED_LENGTH_SECS: u64 = 120;
/// Width reported for a finished video.
pub const FINISHED_WIDTH: u32 = 1920;
/// Height reported for a finished video.
pub const FINISHED_HEIGHT: u32 = 1080;

/// Processing state of a hosted video, encoded numerically on the wire.
///
/// The emulator only drives Queued -> Processing -> Finished; the remaining
/// states exist in the real host's model and are kept for forward
/// compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VideoState {
    Queued = 0,
    Processing = 1,
    Encoding = 2,
    Finished = 3,
    ResolutionFinished = 4,
    Failed = 5,
}

impl VideoState {
    /// Human-readable status name, matching the host's documented table.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoState::Queued => "queued",
            VideoState::Processing => "processing",
            VideoState::Encoding => "encoding",
            VideoState::Finished => "finished",
            VideoState::ResolutionFinished => "resolution_finished",
            VideoState::Failed => "failed",
        }
    }
}

impl From<VideoState> for u8 {
    fn from(state: VideoState) -> u8 {
        state as u8
    }
}

impl TryFrom<u8> for VideoState {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(VideoState::Queued),
            1 => Ok(VideoState::Processing),
            2 => Ok(VideoState::Encoding),
            3 => Ok(VideoState::Finished),
            4 => Ok(VideoState::ResolutionFinished),
            5 => Ok(VideoState::Failed),
            other => Err(format!("unknown video status code: {}", other)),
        }
    }
}

/// A content item tracked by the video host, mirroring the real API's
/// response fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedVideo {
    pub guid: String,
    pub title: String,
    /// Duration in seconds
    pub length: u64,
    pub status: VideoState,
    pub thumbnail_file_name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub created_at: u64,
}

impl HostedVideo {
    /// A freshly created video: queued, no media dimensions yet.
    pub fn queued(guid: String, title: String) -> Self {
        Self {
            guid,
            title,
            length: 0,
            status: VideoState::Queued,
            thumbnail_file_name: String::new(),
            width: 0,
            height: 0,
            created_at: now_ms(),
        }
    }

    /// Synthesized response for a video id the host has never seen.
    ///
    /// Callers querying unknown ids still get a stable, finished-looking
    /// record instead of an error.
    pub fn placeholder(guid: String) -> Self {
        Self {
            title: format!("Video {}", guid),
            guid,
            length: FINISHED_LENGTH_SECS,
            status: VideoState::Finished,
            thumbnail_file_name: String::from("thumbnail.jpg"),
            width: FINISHED_WIDTH,
            height: FINISHED_HEIGHT,
            created_at: now_ms(),
        }
    }

    /// Apply the representative post-transcode media attributes.
    pub fn mark_finished(&mut self) {
        self.status = VideoState::Finished;
        self.length = FINISHED_LENGTH_SECS;
        self.width = FINISHED_WIDTH;
        self.height = FINISHED_HEIGHT;
        self.thumbnail_file_name = String::from("thumbnail.jpg");
    }
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_numeric_codes() {
        let json = serde_json::to_string(&VideoState::Finished).unwrap();
        assert_eq!(json, "3");
        let state: VideoState = serde_json::from_str("1").unwrap();
        assert_eq!(state, VideoState::Processing);
        assert!(serde_json::from_str::<VideoState>("9").is_err());
    }

    #[test]
    fn status_names_match_the_host_table() {
        assert_eq!(VideoState::Queued.as_str(), "queued");
        assert_eq!(VideoState::ResolutionFinished.as_str(), "resolution_finished");
    }

    #[test]
    fn placeholder_looks_finished() {
        let video = HostedVideo::placeholder(String::from("missing-id"));
        assert_eq!(video.status, VideoState::Finished);
        assert_eq!(video.length, FINISHED_LENGTH_SECS);
        assert_eq!(video.width, FINISHED_WIDTH);
        assert_eq!(video.height, FINISHED_HEIGHT);
    }

    #[test]
    fn wire_format_is_camel_case() {
        let video = HostedVideo::queued(String::from("abc"), String::from("t"));
        let value = serde_json::to_value(&video).unwrap();
        assert!(value.get("thumbnailFileName").is_some());
        assert_eq!(value["status"], 0);
    }
}
