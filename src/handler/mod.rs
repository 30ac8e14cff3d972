//! Request handler module
//!
//! Routes requests to the gallery page, the upload endpoint and stored
//! image serving.

pub mod gallery;
pub mod images;
pub mod router;
pub mod upload;

/// Subtree accepting uploads
pub const UPLOAD_PREFIX: &str = "/upload/";
/// Subtree serving stored images, also used as the URL prefix in the gallery
pub const IMAGES_PREFIX: &str = "/images/";

pub use router::handle_request;
