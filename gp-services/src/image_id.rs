//! Image identifier extraction from enabled photo URLs.

use lazy_static::lazy_static;
use regex::Regex;

use gp_core::error::ImageIdError;

lazy_static! {
    /// An enabled photo URL: the image host followed by a single id segment.
    pub static ref IMAGE_URL_RE: Regex =
        Regex::new(r"^https://lh3\.googleusercontent\.com/([A-Za-z0-9_-]+)$").unwrap();
}

/// Extract the image identifier from a photo URL.
pub fn image_id_from_url(url: &str) -> Result<String, ImageIdError> {
    let caps = IMAGE_URL_RE
        .captures(url)
        .ok_or_else(|| ImageIdError::NoMatch(url.to_string()))?;

    // group 0 is the whole match
    let ids: Vec<&str> = caps.iter().skip(1).flatten().map(|m| m.as_str()).collect();
    match ids.as_slice() {
        [id] => Ok(id.to_string()),
        _ => Err(ImageIdError::CaptureCount {
            url: url.to_string(),
            found: ids.len(),
        }),
    }
}
