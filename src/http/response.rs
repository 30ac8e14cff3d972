//! HTTP response building module
//!
//! Builders for every response the gallery sends. Builders never panic; a
//! builder error is logged and an empty response is returned instead.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, ALLOW, CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG,
    LAST_MODIFIED, LOCATION, X_CONTENT_TYPE_OPTIONS,
};
use hyper::{Response, StatusCode};

use super::cache::IMAGE_CACHE_CONTROL;
use super::range::ByteRange;
use crate::error::Error;

pub type HttpResponse = Response<Full<Bytes>>;

/// Validators and type of a served image
#[derive(Debug, Clone)]
pub struct FileHeaders<'a> {
    pub content_type: &'a str,
    pub etag: &'a str,
    pub last_modified: Option<&'a str>,
}

/// Plain-text error response; the body is the error's message
pub fn build_error_response(err: &Error) -> HttpResponse {
    let status = err.status();
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Full::new(Bytes::from(format!("{err}\n"))))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// 405 with the methods the route does accept
pub fn build_405_response(allow: &str) -> HttpResponse {
    let mut resp = build_error_response(&Error::MethodNotAllowed);
    if let Ok(value) = allow.parse() {
        resp.headers_mut().insert(ALLOW, value);
    }
    resp
}

/// Redirect response (302 after upload, 301 for missing trailing slash)
pub fn build_redirect_response(target: &str, status: StatusCode) -> HttpResponse {
    let body = format!(
        "<a href=\"{target}\">{}</a>.\n",
        status.canonical_reason().unwrap_or("Redirect")
    );
    Response::builder()
        .status(status)
        .header(LOCATION, target)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Rendered HTML page
pub fn build_html_response(content: String, is_head: bool) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .header(CONTENT_LENGTH, content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(StatusCode::OK, &e))
}

/// 304 Not Modified response
pub fn build_304_response(headers: &FileHeaders<'_>) -> HttpResponse {
    let mut builder = Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header(ETAG, headers.etag)
        .header(CACHE_CONTROL, IMAGE_CACHE_CONTROL);
    if let Some(modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, modified);
    }
    builder
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| fallback(StatusCode::NOT_MODIFIED, &e))
}

/// 416 Range Not Satisfiable response
pub fn build_416_response(file_size: usize) -> HttpResponse {
    Response::builder()
        .status(StatusCode::RANGE_NOT_SATISFIABLE)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(CONTENT_RANGE, format!("bytes */{file_size}"))
        .body(Full::new(Bytes::from("416 Range Not Satisfiable\n")))
        .unwrap_or_else(|e| fallback(StatusCode::RANGE_NOT_SATISFIABLE, &e))
}

/// 200 with the whole file, or 206 with one range of it
pub fn build_file_response(
    data: Bytes,
    headers: &FileHeaders<'_>,
    range: Option<ByteRange>,
    is_head: bool,
) -> HttpResponse {
    let total_size = data.len();
    let (status, body) = match range {
        Some(r) => (StatusCode::PARTIAL_CONTENT, data.slice(r.start..=r.end)),
        None => (StatusCode::OK, data),
    };
    let content_length = body.len();

    let mut builder = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, headers.content_type)
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes")
        .header(ETAG, headers.etag)
        .header(CACHE_CONTROL, IMAGE_CACHE_CONTROL);
    if let Some(modified) = headers.last_modified {
        builder = builder.header(LAST_MODIFIED, modified);
    }
    if let Some(r) = range {
        builder = builder.header(CONTENT_RANGE, r.content_range(total_size));
    }

    let body = if is_head { Bytes::new() } else { body };
    builder
        .body(Full::new(body))
        .unwrap_or_else(|e| fallback(status, &e))
}

/// Log response build error and return an empty response with `status`
fn fallback(status: StatusCode, error: &hyper::http::Error) -> HttpResponse {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
    let mut resp = Response::new(Full::new(Bytes::new()));
    *resp.status_mut() = status;
    resp
}
