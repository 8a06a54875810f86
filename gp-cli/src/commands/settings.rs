//! Settings commands.

use clap::Subcommand;
use console::style;

use gp_core::config::{AppConfig, ConfigHandle};
use gp_core::error::{GpError, GpResult};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show all settings.
    Show,
    /// Get a specific setting value by key path.
    Get {
        /// Setting key path (e.g., "service.photos_origin", "logging.level").
        key: String,
    },
    /// Set a specific setting value by key path and save the config file.
    Set {
        /// Setting key path (e.g., "service.photos_origin", "logging.level").
        key: String,
        /// New value.
        value: String,
    },
    /// Print the config file path.
    Path,
}

/// Resolve a dot-separated key path to a value from the config.
fn get_setting_value(cfg: &AppConfig, key: &str) -> Option<String> {
    match key {
        "service.photos_origin" => Some(cfg.service.photos_origin.clone()),
        "service.api_timeout_ms" => Some(cfg.service.api_timeout_ms.to_string()),
        "service.user_agent" => Some(cfg.service.user_agent.clone()),
        "credentials.path" => Some(cfg.credentials.path.clone()),
        "logging.level" => Some(cfg.logging.level.clone()),
        "logging.directory" => Some(cfg.logging.directory.clone()),
        "logging.json_output" => Some(cfg.logging.json_output.to_string()),
        _ => None,
    }
}

/// Apply a value to a dot-separated key path on the config.
fn set_setting_value(cfg: &mut AppConfig, key: &str, value: &str) -> Result<(), String> {
    match key {
        "service.photos_origin" => {
            let origin = AppConfig::sanitize_origin(value);
            if origin.is_empty() {
                return Err("origin must not be empty".to_string());
            }
            cfg.service.photos_origin = origin;
        }
        "service.api_timeout_ms" => {
            cfg.service.api_timeout_ms = value.parse().map_err(|_| "invalid integer".to_string())?;
        }
        "service.user_agent" => {
            cfg.service.user_agent = value.to_string();
        }
        "credentials.path" => {
            cfg.credentials.path = value.to_string();
        }
        "logging.level" => {
            let v = value.to_lowercase();
            if !["trace", "debug", "info", "warn", "error"].contains(&v.as_str()) {
                return Err("expected one of: trace, debug, info, warn, error".to_string());
            }
            cfg.logging.level = v;
        }
        "logging.directory" => {
            cfg.logging.directory = value.to_string();
        }
        "logging.json_output" => {
            cfg.logging.json_output = value.parse().map_err(|_| "expected true/false".to_string())?;
        }
        _ => {
            return Err(format!("unknown setting key: {key}"));
        }
    }
    Ok(())
}

fn print_settings_text(cfg: &AppConfig) {
    println!("{}", style("Service").bold().underlined());
    println!("  service.photos_origin    {}", cfg.service.photos_origin);
    println!("  service.api_timeout_ms   {}", cfg.service.api_timeout_ms);
    println!("  service.user_agent       {}", cfg.service.user_agent);
    for (name, value) in &cfg.service.custom_headers {
        println!("  header {name}: {value}");
    }

    println!();
    println!("{}", style("Credentials").bold().underlined());
    println!("  credentials.path         {}", cfg.credentials.path);

    println!();
    println!("{}", style("Logging").bold().underlined());
    println!("  logging.level            {}", cfg.logging.level);
    println!("  logging.directory        {}", cfg.logging.directory);
    println!("  logging.json_output      {}", cfg.logging.json_output);
}

pub async fn run(config: ConfigHandle, action: SettingsAction, format: OutputFormat) -> GpResult<()> {
    match action {
        SettingsAction::Show => {
            let cfg = config.read().await;
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&*cfg)?);
                }
                OutputFormat::Text => {
                    print_settings_text(&cfg);
                }
            }
        }
        SettingsAction::Get { key } => {
            let cfg = config.read().await;
            match get_setting_value(&cfg, &key) {
                Some(value) => match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::json!({ "key": key, "value": value }));
                    }
                    OutputFormat::Text => {
                        println!("{} = {}", key, value);
                    }
                },
                None => {
                    return Err(GpError::Config(format!(
                        "unknown setting key: {key} (see `gphotos-uploader settings show`)"
                    )));
                }
            }
        }
        SettingsAction::Set { key, value } => {
            {
                let mut cfg = config.write().await;
                set_setting_value(&mut cfg, &key, &value)
                    .map_err(|e| GpError::Config(format!("failed to set {key}: {e}")))?;
            }
            config.save().await?;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "key": key, "value": value, "saved": true }));
                }
                OutputFormat::Text => {
                    println!("{} {} = {}", style("SET").green().bold(), key, value);
                }
            }
        }
        SettingsAction::Path => match format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "path": config.path().display().to_string() }));
            }
            OutputFormat::Text => {
                println!("{}", config.path().display());
            }
        },
    }

    Ok(())
}
