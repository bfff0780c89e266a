//! Optional page assets.
//!
//! Assets decorate the page but never gate it: a missing or unreadable file
//! surfaces as an [`AssetError`] that callers log and render around.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Failed to read asset '{0}'")]
    Read(String, #[source] std::io::Error),
}

/// Reads the storm-track animation and inlines it as a GIF data URL.
pub async fn animation_data_url(path: &str) -> Result<String, AssetError> {
    let bytes = fs::read(path)
        .await
        .map_err(|e| AssetError::Read(path.to_string(), e))?;
    Ok(format!("data:image/gif;base64,{}", STANDARD.encode(bytes)))
}

/// Reads an image asset verbatim, for serving next to the page.
pub async fn read_image(path: &str) -> Result<Vec<u8>, AssetError> {
    fs::read(path)
        .await
        .map_err(|e| AssetError::Read(path.to_string(), e))
}
