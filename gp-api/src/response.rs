//! Service response types.
//!
//! The upload endpoints answer with plain JSON session documents. The
//! mutation endpoint answers with an XSSI-guarded, positional JSON array in
//! which each RPC's payload sits under an object keyed by its numeric id.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use gp_core::constants;
use gp_core::error::{GpError, GpResult};

/// Upload session document returned by both upload requests.
///
/// ```json
/// { "sessionStatus": { "state": "OPEN",
///     "externalFieldTransfers": [{ "name": "file", "putInfo": { "url": "..." } }] } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSessionResponse {
    pub session_status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    /// Session state ("OPEN" after creation, "FINALIZED" after the transfer).
    #[serde(default)]
    pub state: String,
    /// Transfers the client still has to perform.
    #[serde(default)]
    pub external_field_transfers: Vec<ExternalFieldTransfer>,
    /// Completion details, present once bytes were received.
    #[serde(default)]
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalFieldTransfer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub put_info: Option<PutInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutInfo {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(rename = "uploader_service.GoogleRupioAdditionalInfo", default)]
    pub rupio: Option<RupioAdditionalInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RupioAdditionalInfo {
    #[serde(default)]
    pub completion_info: Option<CompletionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionInfo {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub customer_specific_info: Option<CustomerSpecificInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSpecificInfo {
    #[serde(default)]
    pub upload_token_base64: Option<String>,
}

impl UploadSessionResponse {
    /// The URL the file bytes must be sent to.
    pub fn upload_url(&self) -> Option<&str> {
        self.session_status
            .external_field_transfers
            .first()
            .and_then(|t| t.put_info.as_ref())
            .map(|p| p.url.as_str())
            .filter(|u| !u.is_empty())
    }

    /// The opaque token identifying the received bytes.
    pub fn upload_token(&self) -> Option<&str> {
        self.session_status
            .additional_info
            .as_ref()
            .and_then(|a| a.rupio.as_ref())
            .and_then(|r| r.completion_info.as_ref())
            .and_then(|c| c.customer_specific_info.as_ref())
            .and_then(|c| c.upload_token_base64.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Build the `f.req` value of a single-RPC mutation request.
pub fn batch_request(rpc_id: u64, args: Value) -> String {
    let mut call = Map::new();
    call.insert(rpc_id.to_string(), args);
    let envelope = Value::Array(vec![Value::Array(vec![
        Value::from("af.maf"),
        Value::Array(vec![Value::Array(vec![
            Value::from("af.add"),
            Value::from(rpc_id),
            Value::Array(vec![Value::Object(call)]),
        ])]),
    ])]);
    envelope.to_string()
}

/// Parse a mutation response body, dropping the XSSI guard line if present.
pub fn parse_batch_body(body: &str) -> GpResult<Value> {
    let trimmed = body.trim_start();
    let json = trimmed
        .strip_prefix(constants::XSSI_PREFIX)
        .unwrap_or(trimmed);
    serde_json::from_str(json.trim())
        .map_err(|e| GpError::Serialization(format!("malformed batch response: {e}")))
}

/// Find the payload of `rpc_id` anywhere in a batch response.
pub fn find_rpc_payload(value: &Value, rpc_id: u64) -> Option<&Value> {
    let key = rpc_id.to_string();
    find_key(value, &key)
}

fn find_key<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map
            .get(key)
            .or_else(|| map.values().find_map(|v| find_key(v, key))),
        Value::Array(items) => items.iter().find_map(|v| find_key(v, key)),
        _ => None,
    }
}

/// All string leaves of a JSON value, depth-first in document order.
pub fn collect_strings(value: &Value) -> Vec<&str> {
    let mut out = Vec::new();
    push_strings(value, &mut out);
    out
}

fn push_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| push_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| push_strings(v, out)),
        _ => {}
    }
}
