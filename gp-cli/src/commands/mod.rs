//! CLI command implementations.

pub mod auth;
pub mod settings;
pub mod upload;

use std::path::{Path, PathBuf};

use gp_api::ApiClient;
use gp_core::config::ConfigHandle;
use gp_core::credentials::SessionCredentials;
use gp_core::error::GpResult;

/// Helper to create an API client from config.
pub async fn create_api_client(config: &ConfigHandle) -> GpResult<ApiClient> {
    let service_config = config.read().await.service.clone();
    ApiClient::new(&service_config)
}

/// Resolve the credentials file: the command-line override, else the config.
pub async fn credentials_path(
    config: &ConfigHandle,
    override_path: Option<&Path>,
) -> GpResult<PathBuf> {
    match override_path {
        Some(path) => Ok(path.to_path_buf()),
        None => config.read().await.effective_credentials_path(),
    }
}

/// Load and validate the session credentials.
pub fn load_credentials(path: &Path) -> GpResult<SessionCredentials> {
    let credentials = SessionCredentials::load_from_file(path)?;
    credentials.validate()?;
    Ok(credentials)
}

/// Format a byte count as a human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
