//! Upload command.

use std::path::{Path, PathBuf};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, warn};

use gp_api::ApiClient;
use gp_core::config::ConfigHandle;
use gp_core::credentials::SessionCredentials;
use gp_core::error::{GpError, GpResult};
use gp_services::{UploadFailure, UploadRequest, UploadResult, UploadWorkflow};

use crate::OutputFormat;

/// Album and session options shared by every file of one invocation.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub album_id: Option<String>,
    pub album_name: Option<String>,
    pub refresh_token: bool,
}

/// Outcome of one file, as printed.
struct FileOutcome {
    file: PathBuf,
    result: UploadResult,
    error: Option<GpError>,
}

impl FileOutcome {
    fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "file": self.file.display().to_string(),
            "ok": self.error.is_none(),
            "uploaded": self.result.uploaded,
            "imageId": self.result.image_id,
            "imageUrl": self.result.image_url,
            "albumId": self.result.album_id,
            "error": self.error.as_ref().map(|e| e.to_string()),
        })
    }
}

pub async fn run(
    config: ConfigHandle,
    credentials_override: Option<PathBuf>,
    files: Vec<PathBuf>,
    options: UploadOptions,
    format: OutputFormat,
) -> GpResult<()> {
    let api = super::create_api_client(&config).await?;
    let creds_path = super::credentials_path(&config, credentials_override.as_deref()).await?;
    let mut credentials = super::load_credentials(&creds_path)?;

    if options.refresh_token || !credentials.has_at_token() {
        super::auth::refresh_at_token(&api, &mut credentials, &creds_path).await?;
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        let outcome = upload_file(&api, &credentials, &file, &options, format).await;
        match format {
            OutputFormat::Json => println!("{}", outcome.to_json()),
            OutputFormat::Text => print_outcome_text(&outcome),
        }
        outcomes.push(outcome);
    }

    let failed = outcomes.iter().filter(|o| o.error.is_some()).count();
    if failed > 0 {
        return Err(GpError::Internal(format!(
            "{failed} of {} uploads failed",
            outcomes.len()
        )));
    }
    Ok(())
}

async fn upload_file(
    api: &ApiClient,
    credentials: &SessionCredentials,
    file: &Path,
    options: &UploadOptions,
    format: OutputFormat,
) -> FileOutcome {
    let failed = |error: GpError| FileOutcome {
        file: file.to_path_buf(),
        result: UploadResult::default(),
        error: Some(error),
    };

    let mut request = match UploadRequest::from_file(file).await {
        Ok(request) => request,
        Err(e) => return failed(e),
    };
    if let Some(album_id) = &options.album_id {
        request = request.with_album_id(album_id.clone());
    }
    if let Some(album_name) = &options.album_name {
        request = request.with_album_name(album_name.clone());
    }

    let workflow = match UploadWorkflow::new(request, credentials, api) {
        Ok(workflow) => workflow,
        Err(e) => return failed(e),
    };

    let pb = match format {
        OutputFormat::Text => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            pb.set_message(format!(
                "Uploading {} ({})",
                workflow.metadata().name,
                super::format_bytes(workflow.metadata().size)
            ));
            Some(pb)
        }
        OutputFormat::Json => None,
    };

    let outcome = match workflow.run().await {
        Ok(result) => FileOutcome {
            file: file.to_path_buf(),
            result,
            error: None,
        },
        Err(UploadFailure { result, error }) => {
            if stored_on_service(&error) {
                warn!("{} was stored but not fully processed: {error}", file.display());
            } else {
                error!("{} was not uploaded: {error}", file.display());
            }
            FileOutcome {
                file: file.to_path_buf(),
                result,
                error: Some(error),
            }
        }
    };

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    outcome
}

/// Whether the failed step ran after the bytes were stored.
fn stored_on_service(error: &GpError) -> bool {
    error.phase().is_some_and(|p| p.is_post_upload())
}

fn print_outcome_text(outcome: &FileOutcome) {
    let file = outcome.file.display();
    match &outcome.error {
        None => {
            println!("{} {}", style("OK").green().bold(), file);
            if let Some(url) = outcome.result.url_string() {
                println!("  Image:     {url}");
            }
            if let Some(album_id) = &outcome.result.album_id {
                println!("  Album:     {album_id}");
            }
        }
        Some(error) if outcome.result.uploaded => {
            println!("{} {}: {}", style("PARTIAL").yellow().bold(), file, error);
            if let Some(url) = &outcome.result.image_url {
                println!("  Image:     {url}");
            }
            if let Some(album_id) = &outcome.result.album_id {
                println!("  Album:     {album_id}");
            }
        }
        Some(error) => {
            println!("{} {}: {}", style("ERROR").red().bold(), file, error);
        }
    }
}
