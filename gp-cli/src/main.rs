//! gphotos-uploader CLI - upload photos from the terminal.
//!
//! Uploads files with a saved browser session, optionally into an existing
//! album or a newly created one, and manages the session and settings.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use gp_core::config::{AppConfig, ConfigHandle};
use gp_core::error::GpResult;
use gp_core::logging;
use gp_core::platform::Platform;

/// gphotos-uploader - upload photos with a saved web session.
#[derive(Parser)]
#[command(
    name = "gphotos-uploader",
    version,
    about = "Upload photos and videos to the photo library",
    long_about = "Upload photos and videos to the photo library using a saved web session.\n\
                  Uploaded files can be added to an existing album or to a new one."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the session credentials file (overrides config).
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files.
    Upload {
        /// Files to upload, in order.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Existing album to add each photo to.
        #[arg(long)]
        album_id: Option<String>,
        /// Create a new album with this name for each photo.
        #[arg(long)]
        album_name: Option<String>,
        /// Fetch a fresh at token before uploading.
        #[arg(long)]
        refresh_token: bool,
    },
    /// Inspect and manage the session credentials.
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// View and modify settings.
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
}

#[tokio::main]
async fn main() -> GpResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match cli.config {
        Some(path) => path,
        None => AppConfig::default_config_path()?,
    };
    let config = if config_path.exists() {
        AppConfig::load_from_file(&config_path)?
    } else {
        AppConfig::default()
    };

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    let log_dir = config.effective_log_dir()?;
    let _guard = logging::init_logging(&log_level, &log_dir, config.logging.json_output)?;

    let config_handle = ConfigHandle::new(config, config_path);

    info!(
        "gphotos-uploader v{} on {}",
        gp_core::constants::APP_VERSION,
        Platform::current()
    );

    match cli.command {
        Commands::Upload {
            files,
            album_id,
            album_name,
            refresh_token,
        } => {
            let options = commands::upload::UploadOptions {
                album_id,
                album_name,
                refresh_token,
            };
            commands::upload::run(config_handle, cli.credentials, files, options, cli.format).await
        }
        Commands::Auth { action } => {
            commands::auth::run(config_handle, cli.credentials, action, cli.format).await
        }
        Commands::Settings { action } => {
            commands::settings::run(config_handle, action, cli.format).await
        }
    }
}
