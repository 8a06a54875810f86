//! Upload session endpoints: open a session, then stream the bytes.

use serde_json::{json, Value};
use tokio_util::io::ReaderStream;
use tracing::debug;

use gp_core::constants;
use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult};

use crate::client::ApiClient;
use crate::response::UploadSessionResponse;
use crate::transport::UploadBody;

/// Description of the file about to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadMetadata {
    /// Display name (file name) of the photo.
    pub name: String,
    /// Exact number of bytes that will be streamed.
    pub size: u64,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

fn inlined(name: &str, content: &str) -> Value {
    json!({
        "inlined": {
            "name": name,
            "content": content,
            "contentType": "text/plain"
        }
    })
}

/// Build the JSON body that opens an upload session.
pub fn upload_session_body(metadata: &UploadMetadata, user_id: &str) -> Value {
    json!({
        "protocolVersion": constants::UPLOAD_PROTOCOL_VERSION,
        "createSessionRequest": {
            "fields": [
                {
                    "external": {
                        "name": "file",
                        "filename": metadata.name,
                        "put": {},
                        "size": metadata.size
                    }
                },
                inlined("auto_create_album", "camera_sync.active"),
                inlined("auto_downsize", "true"),
                inlined("storage_policy", "use_manual_setting"),
                inlined("disable_asbe_notification", "true"),
                inlined("client", "photoweb"),
                inlined("effective_id", user_id),
                inlined("owner_name", user_id),
                inlined("timestamp_ms", &metadata.timestamp_ms.to_string()),
            ]
        }
    })
}

impl ApiClient {
    /// Open an upload session and return the single-use upload URL.
    pub async fn request_upload_url(
        &self,
        credentials: &SessionCredentials,
        metadata: &UploadMetadata,
    ) -> GpResult<String> {
        let body = upload_session_body(metadata, credentials.user_id());
        let resp = self
            .post_json(constants::UPLOAD_SESSION_PATH, credentials, &body)
            .await?;
        let session: UploadSessionResponse = ApiClient::parse_json(resp).await?;

        let url = session
            .upload_url()
            .ok_or_else(|| GpError::UnexpectedResponse("no upload url in session reply".into()))?;
        debug!("upload session opened for {}", metadata.name);
        Ok(url.to_string())
    }

    /// Stream `size` bytes from `body` to the upload URL and return the upload token.
    pub async fn upload_bytes(
        &self,
        credentials: &SessionCredentials,
        upload_url: &str,
        body: UploadBody,
        size: u64,
    ) -> GpResult<String> {
        let stream = reqwest::Body::wrap_stream(ReaderStream::new(body));
        let resp = self
            .post_stream(
                upload_url,
                credentials,
                stream,
                size,
                &[
                    ("X-GUploader-No-308", "yes"),
                    ("X-HTTP-Method-Override", "PUT"),
                ],
            )
            .await?;
        let session: UploadSessionResponse = ApiClient::parse_json(resp).await?;

        session
            .upload_token()
            .map(str::to_string)
            .ok_or_else(|| GpError::UnexpectedResponse("no upload token in transfer reply".into()))
    }
}
