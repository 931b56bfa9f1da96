//! A single-shot HTTP/1.1 server core
//!
//! Each accepted connection gets one buffered request read, one decoded request, one
//! handler call and one encoded response, then the connection is shut down.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use petit_http::connection::HttpConnection;
//! use petit_http::handler::make_handler;
//! use petit_http::protocol::{Content, Request, Response};
//!
//! #[tokio::main]
//! async fn main() {
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:4221").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             if let Err(e) = connection.process(handler).await {
//!                 error!("service has error, cause {}, connection shutdown", e);
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Response {
//!     info!(target = request.target(), "request");
//!     Response::with_content(StatusCode::OK, Content::new(mime::TEXT_PLAIN, "Hello World!"))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: one-shot connection lifecycle
//! - [`protocol`]: request, response and error types
//! - [`codec`]: request decoding and response encoding
//! - [`handler`]: the request handler trait
//!
//! # Limitations
//!
//! - HTTP/1.0 and HTTP/1.1 request lines only
//! - No keep-alive, pipelining, chunked transfer encoding or TLS
//! - A request must fit in the request buffer (1024 bytes by default)
//! - Maximum number of headers: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
