//! Request error type
//!
//! Every handler failure is one of these variants. The status code for each
//! variant lives in a single lookup (`Error::status`) so handlers never pick
//! status codes themselves.

use hyper::StatusCode;

/// Result alias for request-path operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Sniffed content is neither JPEG nor PNG
    #[error("invalid file type, expected JPEG or PNG")]
    InvalidFileType,

    /// Missing or malformed multipart form
    #[error("{0}")]
    BadRequest(String),

    /// Request body exceeded the configured limit
    #[error("request body too large (limit {limit} bytes)")]
    PayloadTooLarge { limit: u64 },

    /// Writing an uploaded image failed
    #[error("failed to store image: {0}")]
    Storage(#[source] std::io::Error),

    /// Listing the image directory failed
    #[error("failed to list images: {0}")]
    Listing(#[source] std::io::Error),

    /// Loading or rendering the gallery template failed
    #[error("template error: {0}")]
    Template(String),

    /// Reading a stored image failed for a reason other than absence
    #[error("failed to read image: {0}")]
    FileRead(#[source] std::io::Error),

    #[error("404 Not Found")]
    NotFound,

    #[error("405 Method Not Allowed")]
    MethodNotAllowed,
}

impl Error {
    /// HTTP status for this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidFileType
            | Self::BadRequest(_)
            | Self::PayloadTooLarge { .. }
            | Self::Storage(_) => StatusCode::BAD_REQUEST,
            Self::Listing(_) | Self::Template(_) | Self::FileRead(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Whether the failure points at the server rather than the client
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Self::Template(err.to_string())
    }
}
