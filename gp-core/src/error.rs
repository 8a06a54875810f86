//! Global error types for gphotos-uploader.
//!
//! All error categories across the workspace are unified into a single
//! `GpError` enum with conversions from underlying library errors. Failures of
//! remote upload steps are wrapped in `GpError::Phase` so the failing step can
//! be read from the error alone.

use thiserror::Error;

/// Convenience type alias for Results using GpError.
pub type GpResult<T> = Result<T, GpError>;

/// Unified error type covering all error categories in gphotos-uploader.
#[derive(Error, Debug)]
pub enum GpError {
    // -- Configuration errors --
    /// Failed to load or parse application configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Session credentials are missing or unusable.
    #[error("credentials error: {0}")]
    Credentials(String),

    // -- Input errors --
    /// Upload input rejected before any network activity.
    #[error("invalid upload request: {0}")]
    Validation(String),

    // -- Network errors --
    /// HTTP request failed.
    #[error("http error: {0}")]
    Http(String),

    /// HTTP request timed out.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Server returned a non-success status.
    #[error("server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The session cookies were rejected.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The response parsed but did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    // -- Upload errors --
    /// The enabled photo URL did not yield an image identifier.
    #[error(transparent)]
    ImageId(#[from] ImageIdError),

    /// A remote upload step failed.
    #[error("{phase}: {source}")]
    Phase {
        /// The step that failed.
        phase: UploadPhase,
        /// The underlying failure.
        source: Box<GpError>,
    },

    // -- File/IO errors --
    /// File system operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Generic --
    /// An unexpected internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GpError {
    /// Wrap this error with the upload phase it occurred in.
    pub fn in_phase(self, phase: UploadPhase) -> Self {
        GpError::Phase {
            phase,
            source: Box::new(self),
        }
    }

    /// The upload phase this error was raised in, if it was wrapped with one.
    pub fn phase(&self) -> Option<UploadPhase> {
        match self {
            GpError::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GpError {
    fn from(e: serde_json::Error) -> Self {
        GpError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for GpError {
    fn from(e: toml::de::Error) -> Self {
        GpError::Config(e.to_string())
    }
}

/// The remote steps of an upload, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    /// Step 1: ask the service for a single-use upload URL.
    RequestUploadUrl,
    /// Step 2: stream the file bytes to the upload URL.
    UploadBytes,
    /// Step 3: commit the upload token as a photo.
    EnablePhoto,
    /// Step 3: read the image identifier out of the photo URL.
    ParseImageId,
    /// Step 4: move the photo into an existing album.
    MoveToAlbum,
    /// Step 4: create a new album holding the photo.
    CreateAlbum,
}

impl UploadPhase {
    /// Whether the file bytes are already stored when this phase fails.
    pub fn is_post_upload(&self) -> bool {
        !matches!(self, Self::RequestUploadUrl | Self::UploadBytes)
    }
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestUploadUrl => write!(f, "can't get an upload url"),
            Self::UploadBytes => write!(f, "can't upload file to the upload url"),
            Self::EnablePhoto => write!(f, "can't enable the uploaded photo"),
            Self::ParseImageId => write!(f, "uploaded photo url has no image id"),
            Self::MoveToAlbum => write!(f, "can't move the photo into the album"),
            Self::CreateAlbum => write!(f, "can't create the album"),
        }
    }
}

/// Failure modes of image identifier extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageIdError {
    /// The URL does not have the `https://lh3.googleusercontent.com/<id>` form.
    #[error("url doesn't contain the image id: {0}")]
    NoMatch(String),

    /// The pattern matched but did not yield exactly one identifier.
    #[error("expected exactly one image id in {url}, found {found}")]
    CaptureCount {
        /// The URL that was matched.
        url: String,
        /// Number of identifier captures found.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gp_error_display() {
        let err = GpError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_phase_wrapping_display() {
        let err = GpError::Http("connection reset".into()).in_phase(UploadPhase::RequestUploadUrl);
        assert_eq!(
            err.to_string(),
            "can't get an upload url: http error: connection reset"
        );
        assert_eq!(err.phase(), Some(UploadPhase::RequestUploadUrl));
    }

    #[test]
    fn test_phase_source_chain() {
        use std::error::Error;
        let err = GpError::Timeout("30s".into()).in_phase(UploadPhase::UploadBytes);
        let source = err.source().expect("phase errors carry a source");
        assert_eq!(source.to_string(), "request timeout: 30s");
    }

    #[test]
    fn test_post_upload_phases() {
        assert!(!UploadPhase::RequestUploadUrl.is_post_upload());
        assert!(!UploadPhase::UploadBytes.is_post_upload());
        assert!(UploadPhase::EnablePhoto.is_post_upload());
        assert!(UploadPhase::ParseImageId.is_post_upload());
        assert!(UploadPhase::MoveToAlbum.is_post_upload());
        assert!(UploadPhase::CreateAlbum.is_post_upload());
    }

    #[test]
    fn test_image_id_error_converts() {
        let err: GpError = ImageIdError::NoMatch("https://example.com/x".into()).into();
        assert_eq!(
            err.to_string(),
            "url doesn't contain the image id: https://example.com/x"
        );
    }
}
