//! Photo endpoints.

use serde_json::json;
use tracing::debug;

use gp_core::constants::rpc;
use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult};

use crate::client::ApiClient;
use crate::response::{collect_strings, find_rpc_payload, parse_batch_body};

/// A photo made visible by the enable request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnabledPhoto {
    /// Internal identifier used to move the photo between albums.
    pub media_key: String,
    /// Viewable URL of the image, as returned by the service.
    pub image_url: String,
}

/// Read the media key and image URL out of an enable response body.
pub fn parse_enable_response(body: &str) -> GpResult<EnabledPhoto> {
    let value = parse_batch_body(body)?;
    let payload = find_rpc_payload(&value, rpc::ENABLE_PHOTO).ok_or_else(|| {
        GpError::UnexpectedResponse("enable reply has no photo payload".into())
    })?;

    let strings = collect_strings(payload);
    let media_key = strings
        .first()
        .filter(|s| !s.starts_with("http"))
        .ok_or_else(|| GpError::UnexpectedResponse("enable reply has no media key".into()))?;
    let image_url = strings
        .iter()
        .find(|s| s.starts_with("http://") || s.starts_with("https://"))
        .ok_or_else(|| GpError::UnexpectedResponse("enable reply has no image url".into()))?;

    Ok(EnabledPhoto {
        media_key: media_key.to_string(),
        image_url: image_url.to_string(),
    })
}

impl ApiClient {
    /// Commit an upload token as a photo.
    pub async fn enable_photo(
        &self,
        credentials: &SessionCredentials,
        upload_token: &str,
        name: &str,
        timestamp_ms: i64,
    ) -> GpResult<EnabledPhoto> {
        let body = self
            .mutate(
                credentials,
                rpc::ENABLE_PHOTO,
                json!([[[upload_token, name, timestamp_ms]]]),
            )
            .await?;

        let photo = parse_enable_response(&body)?;
        debug!("photo enabled with media key {}", photo.media_key);
        Ok(photo)
    }
}
