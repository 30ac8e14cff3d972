//! Image storage module
//!
//! Content sniffing, the content-addressed store, and the gallery listing.
//! All state lives in the image directory; nothing is cached in memory.

pub mod listing;
pub mod sniff;
pub mod store;

pub use listing::{image_extension, list_images};
pub use sniff::{detect_content_type, validate, ImageFormat};
pub use store::{content_digest, image_filename, ImageStore};
