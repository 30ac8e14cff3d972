//! Image upload handler
//!
//! Reads the `image` file part of a multipart form, validates it by content,
//! stores it under its content address and redirects back to the gallery.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{HeaderMap, Request, StatusCode};
use multer::Multipart;

use crate::config::AppState;
use crate::error::{Error, Result};
use crate::http::{self, HttpResponse};
use crate::logger;
use crate::storage;

/// Form field carrying the uploaded file
pub const IMAGE_FIELD: &str = "image";

/// Where the browser goes after a successful upload
const AFTER_UPLOAD: &str = "..";

/// Handle `/upload/`
pub async fn handle_upload<B>(req: Request<B>, state: &AppState) -> Result<HttpResponse>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let image = read_image_field(req, state.max_body_size()).await?;
    let format = storage::validate(&image)?;
    let filename = state.store.save(&image, format).await?;

    logger::log_image_stored(&filename, image.len());
    Ok(http::build_redirect_response(AFTER_UPLOAD, StatusCode::FOUND))
}

/// Extract the bytes of the first file part named `image`
///
/// The body is capped at `limit` bytes both by the declared
/// `Content-Length` and while streaming.
pub async fn read_image_field<B>(req: Request<B>, limit: u64) -> Result<Bytes>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_content_length(req.headers(), limit)?;
    let boundary = multipart_boundary(req.headers())?;

    let body = Limited::new(
        req.into_body(),
        usize::try_from(limit).unwrap_or(usize::MAX),
    );
    let mut multipart = Multipart::new(body.into_data_stream(), boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error(e, limit))?
    {
        // An empty file input still sends the part, with `filename=""`
        let has_file = field.file_name().is_some_and(|f| !f.is_empty());
        if field.name() == Some(IMAGE_FIELD) && has_file {
            return field.bytes().await.map_err(|e| form_error(e, limit));
        }
    }

    Err(Error::BadRequest(format!(
        "no file in form field \"{IMAGE_FIELD}\""
    )))
}

/// Reject a declared body size over the limit before reading anything
fn check_content_length(headers: &HeaderMap, limit: u64) -> Result<()> {
    let Some(value) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };
    match value.to_str().ok().and_then(|s| s.trim().parse::<u64>().ok()) {
        Some(size) if size > limit => Err(Error::PayloadTooLarge { limit }),
        Some(_) => Ok(()),
        None => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: {value:?}, relying on streaming limit"
            ));
            Ok(())
        }
    }
}

fn multipart_boundary(headers: &HeaderMap) -> Result<String> {
    let not_multipart =
        || Error::BadRequest("request Content-Type isn't multipart/form-data".to_string());

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(not_multipart)?;

    multer::parse_boundary(content_type).map_err(|_| not_multipart())
}

/// Map a multipart failure, surfacing the body cap as its own error
fn form_error(err: multer::Error, limit: u64) -> Error {
    if let multer::Error::StreamReadFailed(source) = &err {
        if source.downcast_ref::<LengthLimitError>().is_some() {
            return Error::PayloadTooLarge { limit };
        }
    }
    Error::BadRequest(format!("malformed multipart form: {err}"))
}
