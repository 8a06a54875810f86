//! API endpoint modules organized by category.
//!
//! Each module adds typed methods to `ApiClient` for a group of related endpoints.

pub mod albums;
pub mod photos;
pub mod session;
pub mod upload;
