use serde::{Deserialize, Serialize};

/// A media asset as reported by the payment/video SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAsset {
    pub id: String,
    pub status: String,
    pub playback_id: String,
    /// Duration in seconds
    pub duration: f64,
}

/// A direct-upload slot created through the SDK.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectUpload {
    pub id: String,
    pub url: String,
    pub status: String,
}
