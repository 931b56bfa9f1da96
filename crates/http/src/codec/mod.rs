//! HTTP codec module for decoding requests and encoding responses
//!
//! - [`RequestDecoder`]: decodes the received bytes into a [`Request`](crate::protocol::Request)
//! - [`ResponseEncoder`]: serializes a [`Response`](crate::protocol::Response) into exact wire bytes
//!
//! # Example
//!
//! ```
//! use petit_http::codec::{RequestDecoder, ResponseEncoder};
//! use petit_http::protocol::Response;
//! use tokio_util::codec::Encoder;
//! use bytes::BytesMut;
//!
//! let raw = b"GET / HTTP/1.1\r\n\r\n";
//! let request = RequestDecoder.decode(raw, raw.len()).unwrap();
//! assert_eq!(request.target(), "/");
//!
//! let mut buffer = BytesMut::new();
//! ResponseEncoder::new().encode(Response::ok(), &mut buffer).unwrap();
//! assert_eq!(&buffer[..], b"HTTP/1.1 200 OK\r\n\r\n");
//! ```

mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
