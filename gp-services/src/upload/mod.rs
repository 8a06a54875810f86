//! Upload request construction, the workflow, and its result.

pub mod request;
pub mod result;
pub mod workflow;

pub use request::UploadRequest;
pub use result::{UploadFailure, UploadResult};
pub use workflow::UploadWorkflow;
