//! gphotos-uploader core: foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other workspace crates:
//! - Application configuration (service origin, timeouts, credential location)
//! - Session credentials (cookies, user id, at token)
//! - Global error types, including the upload phase wrapper
//! - Structured logging with tracing
//! - Platform directory helpers and common constants

pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod platform;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use credentials::SessionCredentials;
pub use error::{GpError, GpResult, ImageIdError, UploadPhase};
pub use logging::init_logging;
pub use platform::Platform;
