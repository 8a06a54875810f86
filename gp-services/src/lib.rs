//! gphotos-uploader services - the photo upload workflow.
//!
//! An upload is four remote steps run in strict order against a
//! `PhotosTransport`:
//! - open an upload session and get the upload URL
//! - stream the file bytes and get the upload token
//! - enable the photo and read its image URL and id
//! - optionally move it into an album and/or create a new album for it
//!
//! Failures after the bytes were stored still report what was achieved; see
//! `UploadFailure`.

pub mod image_id;
pub mod upload;

pub use image_id::image_id_from_url;
pub use upload::{UploadFailure, UploadRequest, UploadResult, UploadWorkflow};
