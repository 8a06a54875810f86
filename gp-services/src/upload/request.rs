//! Caller-side description of an upload.

use std::path::Path;

use chrono::{DateTime, Utc};
use tokio::io::AsyncRead;

use gp_api::UploadBody;
use gp_core::error::{GpError, GpResult};

/// What to upload and where to put it.
///
/// Only the stream and a positive size are required; `UploadWorkflow::new`
/// checks both and fills in the name and timestamp when they are missing.
#[derive(Default)]
pub struct UploadRequest {
    /// Source of the file bytes.
    pub stream: Option<UploadBody>,
    /// Exact number of bytes the stream yields.
    pub size: i64,
    /// Display name. Defaults to the current time.
    pub name: Option<String>,
    /// Capture time in ms since the epoch. Defaults to now when absent or negative.
    pub timestamp_ms: Option<i64>,
    /// Existing album to move the photo into.
    pub album_id: Option<String>,
    /// Name of a new album to create with the photo in it.
    pub album_name: Option<String>,
}

impl UploadRequest {
    /// Create a request for `size` bytes read from `stream`.
    pub fn new<R>(stream: R, size: i64) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        Self {
            stream: Some(Box::new(stream)),
            size,
            ..Self::default()
        }
    }

    /// Create a request for a file on disk.
    ///
    /// Size comes from the file metadata, the name from the base file name and
    /// the timestamp from the modification time.
    pub async fn from_file(path: impl AsRef<Path>) -> GpResult<Self> {
        let path = path.as_ref();
        let file = tokio::fs::File::open(path).await?;
        let info = file.metadata().await?;
        if !info.is_file() {
            return Err(GpError::Validation(format!(
                "{} is not a regular file",
                path.display()
            )));
        }

        let size = i64::try_from(info.len())
            .map_err(|_| GpError::Validation(format!("{} is too large", path.display())))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let timestamp_ms = info
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).timestamp_millis());

        Ok(Self {
            stream: Some(Box::new(file)),
            size,
            name,
            timestamp_ms,
            ..Self::default()
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_timestamp_ms(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn with_album_id(mut self, album_id: impl Into<String>) -> Self {
        self.album_id = Some(album_id.into());
        self
    }

    pub fn with_album_name(mut self, album_name: impl Into<String>) -> Self {
        self.album_name = Some(album_name.into());
        self
    }
}

impl std::fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadRequest")
            .field("stream", &self.stream.as_ref().map(|_| "<stream>"))
            .field("size", &self.size)
            .field("name", &self.name)
            .field("timestamp_ms", &self.timestamp_ms)
            .field("album_id", &self.album_id)
            .field("album_name", &self.album_name)
            .finish()
    }
}
