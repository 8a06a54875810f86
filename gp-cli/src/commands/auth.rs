//! Session credential commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use console::style;
use tracing::info;

use gp_api::ApiClient;
use gp_core::config::ConfigHandle;
use gp_core::credentials::SessionCredentials;
use gp_core::error::GpResult;

use crate::OutputFormat;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Show the stored session (cookie values are never printed).
    Show,
    /// Fetch a fresh at token and save it.
    RefreshToken,
    /// Import a credentials file exported from a browser session.
    Import {
        /// Credentials JSON file to import.
        path: PathBuf,
    },
}

/// Fetch a new at token, store it on `credentials` and save them to `path`.
pub async fn refresh_at_token(
    api: &ApiClient,
    credentials: &mut SessionCredentials,
    path: &Path,
) -> GpResult<()> {
    let token = api.fetch_at_token(credentials).await?;
    credentials.set_at_token(token);
    credentials.save_to_file(path)?;
    info!("at token refreshed and saved to {}", path.display());
    Ok(())
}

pub async fn run(
    config: ConfigHandle,
    credentials_override: Option<PathBuf>,
    action: AuthAction,
    format: OutputFormat,
) -> GpResult<()> {
    let path = super::credentials_path(&config, credentials_override.as_deref()).await?;

    match action {
        AuthAction::Show => {
            let creds = SessionCredentials::load_from_file(&path)?;
            let cookie_names: Vec<&str> = creds.cookies.iter().map(|c| c.name.as_str()).collect();
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "path": path.display().to_string(),
                            "userId": creds.user_id(),
                            "cookies": cookie_names,
                            "hasAtToken": creds.has_at_token(),
                            "valid": creds.validate().is_ok(),
                        })
                    );
                }
                OutputFormat::Text => {
                    println!("{}", style("Session").bold().underlined());
                    println!("  File:      {}", path.display());
                    println!("  User id:   {}", creds.user_id());
                    println!("  Cookies:   {}", cookie_names.join(", "));
                    println!(
                        "  At token:  {}",
                        if creds.has_at_token() { "present" } else { "missing" }
                    );
                    if let Err(e) = creds.validate() {
                        println!("  {} {}", style("INVALID").red().bold(), e);
                    }
                }
            }
        }
        AuthAction::RefreshToken => {
            let api = super::create_api_client(&config).await?;
            let mut creds = super::load_credentials(&path)?;
            refresh_at_token(&api, &mut creds, &path).await?;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "refreshed": true, "path": path.display().to_string() }));
                }
                OutputFormat::Text => {
                    println!("{} At token refreshed.", style("OK").green().bold());
                }
            }
        }
        AuthAction::Import { path: source } => {
            let creds = super::load_credentials(&source)?;
            creds.save_to_file(&path)?;
            match format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "imported": source.display().to_string(),
                            "path": path.display().to_string(),
                        })
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "{} Session imported from {} to {}",
                        style("OK").green().bold(),
                        source.display(),
                        path.display()
                    );
                }
            }
        }
    }

    Ok(())
}
