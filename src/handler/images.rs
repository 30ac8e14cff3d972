//! Stored image serving
//!
//! Serves `/images/<name>.<jpeg|png>` from the image directory with `ETag`,
//! `Last-Modified` and single-range support. Content is not re-sniffed; it
//! was validated when it was stored.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hyper::body::Bytes;
use tokio::fs;

use super::router::RequestContext;
use super::IMAGES_PREFIX;
use crate::config::AppState;
use crate::error::{Error, Result};
use crate::http::{self, cache, FileHeaders, HttpResponse, RangeParseResult};
use crate::logger;
use crate::storage;

/// Serve one stored image
pub async fn serve_image(ctx: &RequestContext<'_>, state: &AppState) -> Result<HttpResponse> {
    let relative = ctx.path.strip_prefix(IMAGES_PREFIX).unwrap_or_default();
    let format = storage::image_extension(relative).ok_or(Error::NotFound)?;

    let file_path = resolve_in_dir(state.store.dir(), relative)
        .await
        .ok_or(Error::NotFound)?;

    let metadata = fs::metadata(&file_path).await.map_err(read_error)?;
    if !metadata.is_file() {
        return Err(Error::NotFound);
    }
    let data = Bytes::from(fs::read(&file_path).await.map_err(read_error)?);

    let etag = cache::generate_etag(&data);
    let modified = metadata.modified().ok();
    let last_modified = modified.map(cache::format_http_date);
    let headers = FileHeaders {
        content_type: format.mime_type(),
        etag: &etag,
        last_modified: last_modified.as_deref(),
    };

    // If-None-Match takes precedence; If-Modified-Since only applies without it
    let not_modified = match ctx.if_none_match.as_deref() {
        Some(tags) => cache::check_etag_match(Some(tags), &etag),
        None => modified.is_some_and(|m| {
            cache::not_modified_since(ctx.if_modified_since.as_deref(), m)
        }),
    };
    if not_modified {
        return Ok(http::build_304_response(&headers));
    }

    let range = match http::parse_range_header(ctx.range_header.as_deref(), data.len()) {
        RangeParseResult::Valid(range) => Some(range),
        RangeParseResult::NotSatisfiable => return Ok(http::build_416_response(data.len())),
        RangeParseResult::None => None,
    };

    Ok(http::build_file_response(data, &headers, range, ctx.is_head))
}

/// Resolve `relative` inside `dir`, refusing anything that escapes it
///
/// Returns `None` for missing files as well as traversal attempts.
async fn resolve_in_dir(dir: &Path, relative: &str) -> Option<PathBuf> {
    if relative.is_empty() || relative.split('/').any(|seg| seg == "..") {
        return None;
    }

    let dir_canonical = match fs::canonicalize(dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Image directory not found or inaccessible '{}': {e}",
                dir.display()
            ));
            return None;
        }
    };

    // Missing files are routine 404s, not worth a log line
    let file_canonical = fs::canonicalize(dir.join(relative)).await.ok()?;
    if !file_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative} -> {}",
            file_canonical.display()
        ));
        return None;
    }

    Some(file_canonical)
}

fn read_error(err: std::io::Error) -> Error {
    if err.kind() == ErrorKind::NotFound {
        Error::NotFound
    } else {
        Error::FileRead(err)
    }
}
