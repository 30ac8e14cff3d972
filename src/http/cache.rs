//! HTTP cache validation module
//!
//! `ETag` generation plus `If-None-Match` / `If-Modified-Since` handling for
//! served images.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

use crate::storage::content_digest;

/// `Cache-Control` value for stored images; their names never change meaning
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=3600";

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Strong `ETag` derived from the content's SHA-256
///
/// # Returns
/// Quoted `ETag` string, e.g. `"ba7816bf8f01cfea"`
pub fn generate_etag(content: &[u8]) -> String {
    let digest = content_digest(content);
    format!("\"{}\"", &digest[..16])
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single tag, a comma-separated list, weak tags (`W/"..."`) and
/// the `*` wildcard.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag.split(',').any(|e| {
            let e = e.trim();
            e == "*" || e.strip_prefix("W/").unwrap_or(e) == etag
        })
    })
}

/// Format a modification time as an HTTP date
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE).to_string()
}

/// Whether `If-Modified-Since` lets us answer 304
///
/// HTTP dates have one-second resolution, so the comparison truncates the
/// file time to whole seconds. Unparseable dates never match.
pub fn not_modified_since(if_modified_since: Option<&str>, modified: SystemTime) -> bool {
    let Some(header) = if_modified_since else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(header.trim()) else {
        return false;
    };
    DateTime::<Utc>::from(modified).timestamp() <= since.timestamp()
}
