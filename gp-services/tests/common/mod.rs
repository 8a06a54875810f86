//! Shared test utilities for the upload workflow tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;

use gp_api::{EnabledPhoto, PhotosTransport, UploadBody, UploadMetadata};
use gp_core::credentials::{SessionCookie, SessionCredentials};
use gp_core::error::{GpError, GpResult};

pub const UPLOAD_URL: &str = "https://upload.test/session-1";
pub const UPLOAD_TOKEN: &str = "upload-token-1";
pub const MEDIA_KEY: &str = "media-key-1";
pub const IMAGE_URL: &str = "https://lh3.googleusercontent.com/AbC-123_xyz";
pub const CREATED_ALBUM: &str = "ALBUM123";

/// One remote step, as seen by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RequestUploadUrl,
    UploadBytes,
    EnablePhoto,
    MoveToAlbum,
    CreateAlbum,
}

/// A recorded call with the values the workflow passed in.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    RequestUploadUrl { metadata: UploadMetadata, user_id: String },
    UploadBytes { upload_url: String, size: u64 },
    EnablePhoto { upload_token: String, name: String, timestamp_ms: i64 },
    MoveToAlbum { media_key: String, album_id: String },
    CreateAlbum { media_key: String, album_name: String },
}

impl Call {
    pub fn step(&self) -> Step {
        match self {
            Call::RequestUploadUrl { .. } => Step::RequestUploadUrl,
            Call::UploadBytes { .. } => Step::UploadBytes,
            Call::EnablePhoto { .. } => Step::EnablePhoto,
            Call::MoveToAlbum { .. } => Step::MoveToAlbum,
            Call::CreateAlbum { .. } => Step::CreateAlbum,
        }
    }
}

/// In-memory transport that records every call and can fail at one step.
pub struct MockTransport {
    fail_at: Option<Step>,
    image_url: String,
    calls: Mutex<Vec<Call>>,
    received: Mutex<Vec<u8>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            fail_at: None,
            image_url: IMAGE_URL.to_string(),
            calls: Mutex::new(Vec::new()),
            received: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::new()
        }
    }

    pub fn with_image_url(mut self, url: &str) -> Self {
        self.image_url = url.to_string();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls().iter().map(Call::step).collect()
    }

    pub fn count(&self, step: Step) -> usize {
        self.steps().into_iter().filter(|s| *s == step).count()
    }

    pub fn received(&self) -> Vec<u8> {
        self.received.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> GpResult<()> {
        let step = call.step();
        self.calls.lock().unwrap().push(call);
        if self.fail_at == Some(step) {
            return Err(GpError::ServerError {
                status: 500,
                message: format!("{step:?} rejected"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl PhotosTransport for MockTransport {
    async fn request_upload_url(
        &self,
        credentials: &SessionCredentials,
        metadata: &UploadMetadata,
    ) -> GpResult<String> {
        self.record(Call::RequestUploadUrl {
            metadata: metadata.clone(),
            user_id: credentials.user_id().to_string(),
        })?;
        Ok(UPLOAD_URL.to_string())
    }

    async fn upload_bytes(
        &self,
        _credentials: &SessionCredentials,
        upload_url: &str,
        mut body: UploadBody,
        size: u64,
    ) -> GpResult<String> {
        let mut bytes = Vec::new();
        body.read_to_end(&mut bytes).await?;
        self.received.lock().unwrap().extend_from_slice(&bytes);
        self.record(Call::UploadBytes {
            upload_url: upload_url.to_string(),
            size,
        })?;
        Ok(UPLOAD_TOKEN.to_string())
    }

    async fn enable_photo(
        &self,
        _credentials: &SessionCredentials,
        upload_token: &str,
        metadata: &UploadMetadata,
    ) -> GpResult<EnabledPhoto> {
        self.record(Call::EnablePhoto {
            upload_token: upload_token.to_string(),
            name: metadata.name.clone(),
            timestamp_ms: metadata.timestamp_ms,
        })?;
        Ok(EnabledPhoto {
            media_key: MEDIA_KEY.to_string(),
            image_url: self.image_url.clone(),
        })
    }

    async fn move_to_album(
        &self,
        _credentials: &SessionCredentials,
        media_key: &str,
        album_id: &str,
    ) -> GpResult<()> {
        self.record(Call::MoveToAlbum {
            media_key: media_key.to_string(),
            album_id: album_id.to_string(),
        })
    }

    async fn create_album(
        &self,
        _credentials: &SessionCredentials,
        media_key: &str,
        album_name: &str,
    ) -> GpResult<String> {
        self.record(Call::CreateAlbum {
            media_key: media_key.to_string(),
            album_name: album_name.to_string(),
        })?;
        Ok(CREATED_ALBUM.to_string())
    }
}

/// Credentials for a signed-in test user.
pub fn test_credentials() -> SessionCredentials {
    let mut creds = SessionCredentials::new(
        vec![SessionCookie {
            name: "SID".into(),
            value: "sid-value".into(),
            domain: ".google.com".into(),
        }],
        "user-42",
    );
    creds.set_at_token("at-token-1");
    creds
}

/// Bytes used as the photo content.
pub fn photo_bytes() -> Vec<u8> {
    b"\xFF\xD8\xFF\xE0fake-jpeg-body".to_vec()
}
