//! Core HTTP protocol types.
//!
//! - **Request** ([`request`]): the decoded, owned request
//!   - [`Request`]: header plus optional body
//!   - [`RequestHeader`]: request line and the header values routing looks at
//!
//! - **Response** ([`response`]): what a handler produces
//!   - [`Response`]: status plus optional content
//!   - [`Content`]: content type, optional coding and body bytes
//!
//! - **Error Handling** ([`error`]):
//!   - [`HttpError`]: Top-level error type
//!   - [`ParseError`]: Request parsing errors
//!   - [`SendError`]: Response sending errors

mod request;
pub use request::Request;
pub use request::RequestHeader;

mod response;
pub use response::Content;
pub use response::ContentEncoding;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
