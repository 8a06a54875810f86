//! The upload workflow.
//!
//! A workflow is built from one request and one set of borrowed credentials,
//! is run once, and is consumed by running. The upload URL, upload token and
//! media key discovered along the way only live inside `run`.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use gp_api::{PhotosTransport, UploadBody, UploadMetadata};
use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult, UploadPhase};

use crate::image_id::image_id_from_url;
use crate::upload::request::UploadRequest;
use crate::upload::result::{UploadFailure, UploadResult};

/// A validated, single-use upload.
pub struct UploadWorkflow<'a> {
    transport: &'a dyn PhotosTransport,
    credentials: &'a SessionCredentials,
    body: UploadBody,
    metadata: UploadMetadata,
    album_id: Option<String>,
    album_name: Option<String>,
}

fn default_name(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
}

impl<'a> UploadWorkflow<'a> {
    /// Validate `request` and bind it to the credentials and transport.
    ///
    /// Fails before any network activity if the stream is missing, the
    /// size is not positive, or the credentials carry no at token.
    pub fn new(
        request: UploadRequest,
        credentials: &'a SessionCredentials,
        transport: &'a dyn PhotosTransport,
    ) -> GpResult<Self> {
        let UploadRequest {
            stream,
            size,
            name,
            timestamp_ms,
            album_id,
            album_name,
        } = request;

        let body = stream
            .ok_or_else(|| GpError::Validation("the upload stream is missing".into()))?;
        if size <= 0 {
            return Err(GpError::Validation(format!(
                "the upload size must be positive, got {size}"
            )));
        }

        // enable and album steps post with the at token
        if !credentials.has_at_token() {
            return Err(GpError::Credentials("missing at token".into()));
        }

        let now = Utc::now();
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| default_name(now));
        let timestamp_ms = timestamp_ms
            .filter(|t| *t >= 0)
            .unwrap_or_else(|| now.timestamp_millis());

        Ok(Self {
            transport,
            credentials,
            body,
            metadata: UploadMetadata {
                name,
                size: size as u64,
                timestamp_ms,
            },
            album_id: album_id.filter(|id| !id.is_empty()),
            album_name: album_name.filter(|n| !n.is_empty()),
        })
    }

    /// Name, size and timestamp that will be sent.
    pub fn metadata(&self) -> &UploadMetadata {
        &self.metadata
    }

    /// Run every step in order.
    ///
    /// `Ok` only when every requested step succeeded. Otherwise the failure
    /// holds the failed phase and the partial result; `result.uploaded` tells
    /// whether the bytes reached the service.
    pub async fn run(self) -> Result<UploadResult, UploadFailure> {
        let Self {
            transport,
            credentials,
            body,
            metadata,
            album_id,
            album_name,
        } = self;

        info!("uploading {} ({} bytes)", metadata.name, metadata.size);

        let upload_url = transport
            .request_upload_url(credentials, &metadata)
            .await
            .map_err(|e| {
                UploadFailure::new(
                    UploadResult::default(),
                    e.in_phase(UploadPhase::RequestUploadUrl),
                )
            })?;
        debug!("upload url acquired for {}", metadata.name);

        let upload_token = transport
            .upload_bytes(credentials, &upload_url, body, metadata.size)
            .await
            .map_err(|e| {
                UploadFailure::new(UploadResult::default(), e.in_phase(UploadPhase::UploadBytes))
            })?;
        debug!("bytes of {} stored", metadata.name);

        // From here on the bytes are on the service.
        let mut result = UploadResult {
            uploaded: true,
            ..UploadResult::default()
        };

        let photo = match transport
            .enable_photo(credentials, &upload_token, &metadata)
            .await
        {
            Ok(photo) => photo,
            Err(e) => {
                warn!(
                    "{} has been uploaded, but the image url in the reply was not found. The image may not appear",
                    metadata.name
                );
                return Err(UploadFailure::new(result, e.in_phase(UploadPhase::EnablePhoto)));
            }
        };
        result.image_url = Some(photo.image_url.clone());

        let image_id = match image_id_from_url(&photo.image_url) {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    "{} has been uploaded, but the image url {} does not contain its id. The image may not appear",
                    metadata.name, photo.image_url
                );
                return Err(UploadFailure::new(
                    result,
                    GpError::from(e).in_phase(UploadPhase::ParseImageId),
                ));
            }
        };
        result.image_id = Some(image_id);

        let mut move_error = None;
        if let Some(album_id) = album_id.as_deref() {
            if let Err(e) = transport
                .move_to_album(credentials, &photo.media_key, album_id)
                .await
            {
                warn!(
                    "{} has been uploaded, but it was not moved into album {}: {}",
                    metadata.name, album_id, e
                );
                move_error = Some(e.in_phase(UploadPhase::MoveToAlbum));
            }
        }

        if let Some(album_name) = album_name.as_deref() {
            match transport
                .create_album(credentials, &photo.media_key, album_name)
                .await
            {
                Ok(created) => result.album_id = Some(created),
                Err(e) => {
                    warn!(
                        "{} has been uploaded, but album {:?} hasn't been created",
                        metadata.name, album_name
                    );
                    return Err(UploadFailure::new(result, e.in_phase(UploadPhase::CreateAlbum)));
                }
            }
        }

        if let Some(error) = move_error {
            return Err(UploadFailure::new(result, error));
        }

        info!(
            "uploaded {} as {}",
            metadata.name,
            result.image_id.as_deref().unwrap_or_default()
        );
        Ok(result)
    }
}

impl std::fmt::Debug for UploadWorkflow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadWorkflow")
            .field("metadata", &self.metadata)
            .field("album_id", &self.album_id)
            .field("album_name", &self.album_name)
            .finish_non_exhaustive()
    }
}
