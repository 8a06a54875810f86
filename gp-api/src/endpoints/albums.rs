//! Album endpoints.

use serde_json::json;
use tracing::debug;

use gp_core::constants::rpc;
use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult};

use crate::client::ApiClient;
use crate::response::{collect_strings, find_rpc_payload, parse_batch_body};

/// Read the new album id out of a create-album response body.
pub fn parse_created_album(body: &str) -> GpResult<String> {
    let value = parse_batch_body(body)?;
    find_rpc_payload(&value, rpc::CREATE_ALBUM)
        .and_then(|payload| collect_strings(payload).first().map(|s| s.to_string()))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GpError::UnexpectedResponse("create album reply has no album id".into()))
}

impl ApiClient {
    /// Add an enabled photo to an existing album.
    pub async fn move_to_album(
        &self,
        credentials: &SessionCredentials,
        media_key: &str,
        album_id: &str,
    ) -> GpResult<()> {
        self.mutate(credentials, rpc::MOVE_TO_ALBUM, json!([[media_key], album_id]))
            .await?;
        debug!("moved {} into album {}", media_key, album_id);
        Ok(())
    }

    /// Create an album named `album_name` holding the photo and return its id.
    pub async fn create_album(
        &self,
        credentials: &SessionCredentials,
        media_key: &str,
        album_name: &str,
    ) -> GpResult<String> {
        let body = self
            .mutate(credentials, rpc::CREATE_ALBUM, json!([[media_key], null, album_name]))
            .await?;
        let album_id = parse_created_album(&body)?;
        debug!("created album {} ({})", album_name, album_id);
        Ok(album_id)
    }
}
