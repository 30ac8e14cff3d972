//! Content sniffing
//!
//! Determines a buffer's media type from its leading bytes. Only the first
//! `SNIFF_LEN` bytes are ever inspected.

use crate::error::{Error, Result};

/// Number of leading bytes considered when sniffing
pub const SNIFF_LEN: usize = 512;

/// Image formats accepted for storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

impl ImageFormat {
    /// File extension used for stored images (without the dot)
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Map a bare extension back to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }
}

/// Magic-number table, checked in order
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"\x89PNG\r\n\x1A\n", "image/png"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"%PDF-", "application/pdf"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1F\x8B\x08", "application/x-gzip"),
];

/// Detect the media type of `data` by inspecting its leading bytes
///
/// # Examples
/// ```
/// use image_gallery::storage::sniff::detect_content_type;
/// assert_eq!(detect_content_type(b"\x89PNG\r\n\x1A\n\0\0"), "image/png");
/// assert_eq!(detect_content_type(b"hello"), "text/plain; charset=utf-8");
/// ```
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let head = &data[..data.len().min(SNIFF_LEN)];

    if let Some(&(_, mime)) = SIGNATURES.iter().find(|(magic, _)| head.starts_with(magic)) {
        return mime;
    }

    // RIFF container with a WEBP form type
    if head.len() >= 12 && head.starts_with(b"RIFF") && &head[8..12] == b"WEBP" {
        return "image/webp";
    }

    if head.iter().any(|&b| is_binary_byte(b)) {
        "application/octet-stream"
    } else {
        "text/plain; charset=utf-8"
    }
}

/// Control bytes that never appear in text
const fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}

/// Accept `data` only if it sniffs as JPEG or PNG
pub fn validate(data: &[u8]) -> Result<ImageFormat> {
    match detect_content_type(data) {
        "image/jpeg" => Ok(ImageFormat::Jpeg),
        "image/png" => Ok(ImageFormat::Png),
        _ => Err(Error::InvalidFileType),
    }
}
