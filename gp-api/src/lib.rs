//! gphotos-uploader API - HTTP client for the photo web service.
//!
//! This crate replays the requests a logged-in browser makes when uploading
//! a photo: opening an upload session, streaming the bytes, enabling the
//! photo, and editing albums. Every request carries the caller's session
//! cookies. The `PhotosTransport` trait is the seam the upload workflow is
//! written against.

pub mod client;
pub mod endpoints;
pub mod response;
pub mod transport;

// Re-export key types
pub use client::ApiClient;
pub use endpoints::photos::EnabledPhoto;
pub use endpoints::upload::UploadMetadata;
pub use transport::{PhotosTransport, UploadBody};
