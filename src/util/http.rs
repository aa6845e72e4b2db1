//! HTTP utilities for downloading packaging tools.

use crate::error::Result;

/// Downloads a file from a URL.
///
/// Returns the file contents as a byte vector. Non-success HTTP statuses are
/// reported as errors rather than silently writing an error page to disk.
///
/// Used by the AppImage packager to fetch appimagetool when it is absent both
/// locally and on PATH.
pub async fn download(url: &str) -> Result<Vec<u8>> {
    log::info!("Downloading {}", url);

    let response = reqwest::get(url).await?.error_for_status()?;
    let bytes = response.bytes().await?;

    Ok(bytes.to_vec())
}
