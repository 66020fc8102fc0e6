use crate::domain::media::{DirectUpload, MediaAsset};
use async_trait::async_trait;
use std::error::Error;

#[async_trait]
pub trait MediaSdkPort: Send + Sync {
    /// Create an asset from an input URL.
    async fn create_asset(
        &self,
        input_url: &str,
    ) -> Result<MediaAsset, Box<dyn Error + Send + Sync>>;

    /// Fetch an asset by id.
    async fn get_asset(&self, asset_id: &str)
        -> Result<MediaAsset, Box<dyn Error + Send + Sync>>;

    /// Delete an asset by id.
    async fn delete_asset(&self, asset_id: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Create a direct-upload slot.
    async fn create_direct_upload(&self) -> Result<DirectUpload, Box<dyn Error + Send + Sync>>;
}
