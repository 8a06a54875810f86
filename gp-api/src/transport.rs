//! The transport seam between the upload workflow and the HTTP client.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use gp_core::credentials::SessionCredentials;
use gp_core::error::GpResult;

use crate::client::ApiClient;
use crate::endpoints::photos::EnabledPhoto;
use crate::endpoints::upload::UploadMetadata;

/// Byte source of an upload. Read once, during the transfer step.
pub type UploadBody = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// The remote calls an upload is made of.
///
/// Every call borrows the session credentials for its duration only.
/// Implementations must be safe to share between concurrent uploads.
#[async_trait]
pub trait PhotosTransport: Send + Sync {
    /// Open an upload session and return the upload URL.
    async fn request_upload_url(
        &self,
        credentials: &SessionCredentials,
        metadata: &UploadMetadata,
    ) -> GpResult<String>;

    /// Stream the file bytes and return the upload token.
    async fn upload_bytes(
        &self,
        credentials: &SessionCredentials,
        upload_url: &str,
        body: UploadBody,
        size: u64,
    ) -> GpResult<String>;

    /// Commit the upload token as a photo.
    async fn enable_photo(
        &self,
        credentials: &SessionCredentials,
        upload_token: &str,
        metadata: &UploadMetadata,
    ) -> GpResult<EnabledPhoto>;

    /// Add the photo to an existing album.
    async fn move_to_album(
        &self,
        credentials: &SessionCredentials,
        media_key: &str,
        album_id: &str,
    ) -> GpResult<()>;

    /// Create an album holding the photo and return the album id.
    async fn create_album(
        &self,
        credentials: &SessionCredentials,
        media_key: &str,
        album_name: &str,
    ) -> GpResult<String>;
}

#[async_trait]
impl PhotosTransport for ApiClient {
    async fn request_upload_url(
        &self,
        credentials: &SessionCredentials,
        metadata: &UploadMetadata,
    ) -> GpResult<String> {
        ApiClient::request_upload_url(self, credentials, metadata).await
    }

    async fn upload_bytes(
        &self,
        credentials: &SessionCredentials,
        upload_url: &str,
        body: UploadBody,
        size: u64,
    ) -> GpResult<String> {
        ApiClient::upload_bytes(self, credentials, upload_url, body, size).await
    }

    async fn enable_photo(
        &self,
        credentials: &SessionCredentials,
        upload_token: &str,
        metadata: &UploadMetadata,
    ) -> GpResult<EnabledPhoto> {
        ApiClient::enable_photo(
            self,
            credentials,
            upload_token,
            &metadata.name,
            metadata.timestamp_ms,
        )
        .await
    }

    async fn move_to_album(
        &self,
        credentials: &SessionCredentials,
        media_key: &str,
        album_id: &str,
    ) -> GpResult<()> {
        ApiClient::move_to_album(self, credentials, media_key, album_id).await
    }

    async fn create_album(
        &self,
        credentials: &SessionCredentials,
        media_key: &str,
        album_name: &str,
    ) -> GpResult<String> {
        ApiClient::create_album(self, credentials, media_key, album_name).await
    }
}
