//! HTTP connection handling module
//!
//! - [`HttpConnection`]: drives one accepted connection through its whole life:
//!   - reading into a fixed-capacity buffer until the request is whole (optionally with a deadline)
//!   - request decoding
//!   - handler invocation
//!   - response encoding, write and shutdown

mod http_connection;

pub use http_connection::DEFAULT_REQUEST_BUFFER_SIZE;
pub use http_connection::HttpConnection;
