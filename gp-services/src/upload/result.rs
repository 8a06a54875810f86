//! Outcome of an upload.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use gp_core::constants;
use gp_core::error::{GpError, UploadPhase};

/// What an upload achieved.
///
/// On failure the same record is carried by `UploadFailure`, filled with
/// whatever the completed steps produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Whether the service confirmed receiving the file bytes.
    pub uploaded: bool,
    /// Identifier parsed from the image URL.
    pub image_id: Option<String>,
    /// Viewable image URL returned by the service, even if no id could be parsed.
    pub image_url: Option<String>,
    /// Id of the album created for the photo.
    pub album_id: Option<String>,
}

impl UploadResult {
    /// Rebuild the viewable URL from the stored image id.
    pub fn url_string(&self) -> Option<String> {
        self.image_id.as_deref().map(constants::image_url)
    }
}

/// A failed upload step, with the partial result reached before it.
///
/// A failure does not mean nothing was stored: check `result.uploaded`.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct UploadFailure {
    pub result: UploadResult,
    pub error: GpError,
}

impl UploadFailure {
    pub(crate) fn new(result: UploadResult, error: GpError) -> Self {
        Self { result, error }
    }

    /// The step that failed.
    pub fn phase(&self) -> Option<UploadPhase> {
        self.error.phase()
    }
}
