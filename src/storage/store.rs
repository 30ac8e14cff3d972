//! Content-addressed image store
//!
//! Stored files are named `<hex sha256>.<ext>`, so writing the same bytes
//! twice lands on the same file.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tokio::fs;

use super::sniff::ImageFormat;
use crate::error::{Error, Result};

/// Hex-encoded SHA-256 of `data`
pub fn content_digest(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Content-addressed filename for `data`
pub fn image_filename(data: &[u8], format: ImageFormat) -> String {
    format!("{}.{}", content_digest(data), format.extension())
}

/// Image directory on the local filesystem
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the image directory if it is missing
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Write `data` under its content-addressed name and return that name
    ///
    /// Existing files with the same name are overwritten; their content is
    /// identical by construction.
    pub async fn save(&self, data: &[u8], format: ImageFormat) -> Result<String> {
        self.ensure_dir().await.map_err(Error::Storage)?;

        let filename = image_filename(data, format);
        fs::write(self.dir.join(&filename), data)
            .await
            .map_err(Error::Storage)?;

        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1A\n\x00\x01";

    #[test]
    fn test_image_filename() {
        let name = image_filename(b"abc", ImageFormat::Jpeg);
        assert_eq!(
            name,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad.jpeg"
        );
    }

    #[test]
    fn test_digest_is_64_hex_chars() {
        let digest = content_digest(PNG);
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[tokio::test]
    async fn test_save_creates_dir_and_writes() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path().join("images"));

        let name = store.save(PNG, ImageFormat::Png).await.unwrap();

        assert_eq!(name, image_filename(PNG, ImageFormat::Png));
        let on_disk = std::fs::read(store.dir().join(&name)).unwrap();
        assert_eq!(on_disk, PNG);
    }

    #[tokio::test]
    async fn test_save_twice_yields_one_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ImageStore::new(tmp.path());

        let first = store.save(PNG, ImageFormat::Png).await.unwrap();
        let second = store.save(PNG, ImageFormat::Png).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_save_into_file_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();
        let store = ImageStore::new(&blocker);

        let err = store.save(PNG, ImageFormat::Png).await.unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
