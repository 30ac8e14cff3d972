//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: route matching, method checks,
//! and the single place where handler errors become responses.

use std::convert::Infallible;
use std::sync::Arc;

use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, RANGE, SERVER};
use hyper::{Method, Request, StatusCode};

use super::{gallery, images, upload, IMAGES_PREFIX, UPLOAD_PREFIX};
use crate::config::AppState;
use crate::error::Error;
use crate::http::{self, HttpResponse};
use crate::logger;

/// Request context encapsulating information needed by read-only handlers
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub range_header: Option<String>,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let header = |name: HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };

        Self {
            path: req.uri().path(),
            is_head: req.method() == Method::HEAD,
            if_none_match: header(IF_NONE_MATCH),
            if_modified_since: header(IF_MODIFIED_SINCE),
            range_header: header(RANGE),
        }
    }
}

/// Which handler a path belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Gallery,
    Upload,
    Images,
    /// Subtree root requested without its trailing slash
    AddSlash(&'static str),
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        if path == UPLOAD_PREFIX.trim_end_matches('/') {
            Self::AddSlash(UPLOAD_PREFIX)
        } else if path == IMAGES_PREFIX.trim_end_matches('/') {
            Self::AddSlash(IMAGES_PREFIX)
        } else if path.starts_with(UPLOAD_PREFIX) {
            Self::Upload
        } else if path.starts_with(IMAGES_PREFIX) {
            Self::Images
        } else {
            // "/" is a catch-all, like a subtree pattern rooted at the top
            Self::Gallery
        }
    }
}

/// Main entry point for HTTP request handling
///
/// Generic over the body so the same path serves hyper connections and
/// in-memory bodies in tests.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> std::result::Result<HttpResponse, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    logger::log_request(req.method(), req.uri(), req.version());

    let route = Route::resolve(req.uri().path());
    let result = match route {
        Route::Upload => upload::handle_upload(req, &state).await,
        Route::AddSlash(target) => Ok(redirect_with_slash(&req, target)),
        route => {
            if let Err(resp) = check_read_method(req.method()) {
                return Ok(with_server_header(resp, &state));
            }
            let ctx = RequestContext::from_request(&req);
            if route == Route::Images {
                images::serve_image(&ctx, &state).await
            } else {
                gallery::serve_gallery(&ctx, &state).await
            }
        }
    };

    let response = result.unwrap_or_else(|err| error_response(&err));
    Ok(with_server_header(response, &state))
}

/// Only GET and HEAD read images and the gallery
fn check_read_method(method: &Method) -> std::result::Result<(), HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => Ok(()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Err(http::build_405_response("GET, HEAD"))
        }
    }
}

/// 301 to the slash-terminated subtree, keeping the query string
fn redirect_with_slash<B>(req: &Request<B>, target: &str) -> HttpResponse {
    let location = match req.uri().query() {
        Some(q) => format!("{target}?{q}"),
        None => target.to_string(),
    };
    http::build_redirect_response(&location, StatusCode::MOVED_PERMANENTLY)
}

/// Convert a handler error to its response, logging anything worth a look
fn error_response(err: &Error) -> HttpResponse {
    match err {
        Error::NotFound | Error::MethodNotAllowed => {}
        _ if err.is_server_error() => logger::log_error(&err.to_string()),
        _ => logger::log_warning(&err.to_string()),
    }
    http::build_error_response(err)
}

fn with_server_header(mut resp: HttpResponse, state: &AppState) -> HttpResponse {
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        resp.headers_mut().insert(SERVER, value);
    }
    resp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_resolve() {
        assert_eq!(Route::resolve("/"), Route::Gallery);
        assert_eq!(Route::resolve("/anything/else"), Route::Gallery);
        assert_eq!(Route::resolve("/upload/"), Route::Upload);
        assert_eq!(Route::resolve("/upload/extra"), Route::Upload);
        assert_eq!(Route::resolve("/images/a.png"), Route::Images);
        assert_eq!(Route::resolve("/images/"), Route::Images);
        assert_eq!(Route::resolve("/upload"), Route::AddSlash("/upload/"));
        assert_eq!(Route::resolve("/images"), Route::AddSlash("/images/"));
        assert_eq!(Route::resolve("/uploads"), Route::Gallery);
    }

    #[test]
    fn test_read_methods() {
        assert!(check_read_method(&Method::GET).is_ok());
        assert!(check_read_method(&Method::HEAD).is_ok());
        let resp = check_read_method(&Method::DELETE).unwrap_err();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_request_context_headers() {
        let req = Request::builder()
            .method("HEAD")
            .uri("/images/a.png")
            .header("range", "bytes=0-1")
            .header("if-none-match", "\"x\"")
            .body(())
            .unwrap();
        let ctx = RequestContext::from_request(&req);
        assert!(ctx.is_head);
        assert_eq!(ctx.path, "/images/a.png");
        assert_eq!(ctx.range_header.as_deref(), Some("bytes=0-1"));
        assert_eq!(ctx.if_none_match.as_deref(), Some("\"x\""));
        assert_eq!(ctx.if_modified_since, None);
    }
}
