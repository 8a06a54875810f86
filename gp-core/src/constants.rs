//! Application-wide constants.

/// Application name, also used for data and config directory names.
pub const APP_NAME: &str = "gphotos-uploader";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default origin of the photo web service.
pub const DEFAULT_PHOTOS_ORIGIN: &str = "https://photos.google.com";

/// Host serving uploaded images. Enabled photo URLs live directly under it.
pub const IMAGE_HOST_URL: &str = "https://lh3.googleusercontent.com";

/// Path of the endpoint handing out upload URLs.
pub const UPLOAD_SESSION_PATH: &str = "/_/upload/uploadmedia/rupio?authuser=0";

/// Path of the batch mutation endpoint used to enable photos and edit albums.
pub const MUTATE_PATH: &str = "/_/PhotosUi/mutate";

/// Protocol version sent when opening an upload session.
pub const UPLOAD_PROTOCOL_VERSION: &str = "0.8";

/// Prefix guarding batch JSON responses against script inclusion.
pub const XSSI_PREFIX: &str = ")]}'";

/// Default request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 30_000;

/// Extended timeout multiplier for byte transfers.
pub const EXTENDED_TIMEOUT_MULTIPLIER: u64 = 12;

/// Browser user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// RPC identifiers of the batch mutation endpoint.
pub mod rpc {
    /// Commit an upload token as a photo.
    pub const ENABLE_PHOTO: u64 = 73_725_281;
    /// Add photos to an existing album.
    pub const MOVE_TO_ALBUM: u64 = 79_956_622;
    /// Create an album holding the given photos.
    pub const CREATE_ALBUM: u64 = 79_956_623;
}

/// Build the viewable URL of an image from its identifier.
pub fn image_url(image_id: &str) -> String {
    format!("{IMAGE_HOST_URL}/{image_id}")
}
