//! Gallery listing
//!
//! Reads the image directory's immediate entries and keeps regular files
//! with a stored-image extension, in directory enumeration order.

use std::path::Path;

use tokio::fs;

use super::sniff::ImageFormat;
use crate::error::{Error, Result};

/// Extension of `name` if it is one the gallery shows
pub fn image_extension(name: &str) -> Option<ImageFormat> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageFormat::from_extension)
}

/// List stored image filenames in `dir`
pub async fn list_images(dir: &Path) -> Result<Vec<String>> {
    let mut entries = fs::read_dir(dir).await.map_err(Error::Listing)?;
    let mut images = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(Error::Listing)? {
        // file_type() does not follow symlinks
        let file_type = entry.file_type().await.map_err(Error::Listing)?;
        if !file_type.is_file() {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if image_extension(&name).is_some() {
            images.push(name);
        }
    }

    Ok(images)
}
