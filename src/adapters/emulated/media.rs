//! Media SDK emulator. The SDK is not the primary video path, so static
//! ready-state responses are enough to keep its callers working offline.

use crate::domain::media::{DirectUpload, MediaAsset};
use crate::ports::media::MediaSdkPort;
use async_trait::async_trait;
use std::error::Error;
use std::sync::Once;
use uuid::Uuid;

static INIT_LOG: Once = Once::new();

#[derive(Debug, Clone, Copy)]
pub struct EmulatedMediaSdk;

impl EmulatedMediaSdk {
    pub fn new() -> Self {
        INIT_LOG.call_once(|| {
            println!("[EmuMedia] media SDK emulator active");
        });
        Self
    }
}

impl Default for EmulatedMediaSdk {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaSdkPort for EmulatedMediaSdk {
    async fn create_asset(
        &self,
        _input_url: &str,
    ) -> Result<MediaAsset, Box<dyn Error + Send + Sync>> {
        Ok(MediaAsset {
            id: format!("emu-asset-{}", Uuid::new_v4()),
            status: String::from("ready"),
            playback_id: format!("emu-playback-{}", Uuid::new_v4()),
            duration: 120.0,
        })
    }

    async fn get_asset(
        &self,
        asset_id: &str,
    ) -> Result<MediaAsset, Box<dyn Error + Send + Sync>> {
        Ok(MediaAsset {
            id: asset_id.to_string(),
            status: String::from("ready"),
            playback_id: format!("emu-playback-{}", Uuid::new_v4()),
            duration: 120.0,
        })
    }

    async fn delete_asset(&self, _asset_id: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    async fn create_direct_upload(&self) -> Result<DirectUpload, Box<dyn Error + Send + Sync>> {
        let id = format!("emu-upload-{}", Uuid::new_v4());
        Ok(DirectUpload {
            url: format!("https://uploads.localhost/{}", id),
            id,
            status: String::from("waiting"),
        })
    }
}
