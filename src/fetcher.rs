use std::io::Cursor;
use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{Result, SnapmorphError};

/// Fixed name of the offered download.
pub const DOWNLOAD_FILENAME: &str = "transformed_photo.png";

/// The result fetch is a convenience, not a requirement; it gets a short
/// leash and its failure degrades to a plain link.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches the transformed image's bytes from the result locator.
pub async fn fetch_result(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| SnapmorphError::ResultFetch(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SnapmorphError::ResultFetch(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(SnapmorphError::ResultFetch(format!(
            "unexpected status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SnapmorphError::ResultFetch(e.to_string()))?;

    log::debug!("Fetched result image ({} bytes)", bytes.len());
    Ok(bytes.to_vec())
}

/// Re-encodes any decodable result into PNG for the download.
pub fn normalize_png(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)?;
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageOutputFormat::Png)?;
    Ok(buf.into_inner())
}
