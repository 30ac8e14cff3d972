//! HTTP protocol layer module
//!
//! Protocol helpers shared by the handlers: cache validators, range parsing
//! and response builders.

pub mod cache;
pub mod range;
pub mod response;

pub use range::{parse_range_header, ByteRange, RangeParseResult};
pub use response::{
    build_304_response, build_405_response, build_416_response, build_error_response,
    build_file_response, build_html_response, build_redirect_response, FileHeaders,
    HttpResponse,
};
