//! HTTP response encoder
//!
//! Serializes a [`Response`] into its exact wire form:
//!
//! ```text
//! HTTP/1.1 <code> <reason>\r\n
//! Content-Type: <mime>\r\n        (only with content)
//! Content-Encoding: <coding>\r\n  (only when the body is encoded)
//! Content-Length: <n>\r\n         (only with content)
//! \r\n
//! <body>
//! ```
//!
//! `Content-Length` is taken from the body being written, after any compression.

use crate::protocol::{Response, SendError};

use bytes::{BufMut, BytesMut};
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for the status line and headers
const INIT_HEADER_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<&Response>>::encode(self, &item, dst)
    }
}

impl Encoder<&Response> for ResponseEncoder {
    type Error = SendError;

    /// Encodes the response into the provided bytes buffer.
    ///
    /// # Errors
    ///
    /// Returns error if writing to the buffer fails
    fn encode(&mut self, item: &Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let status = item.status();
        let body_len = item.content().map_or(0, |content| content.content_length());

        dst.reserve(INIT_HEADER_SIZE + body_len);
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or_default())?;

        if let Some(content) = item.content() {
            dst.put_slice(b"Content-Type: ");
            dst.put_slice(content.content_type().as_ref().as_bytes());
            dst.put_slice(b"\r\n");

            if let Some(encoding) = content.encoding() {
                dst.put_slice(b"Content-Encoding: ");
                dst.put_slice(encoding.as_str().as_bytes());
                dst.put_slice(b"\r\n");
            }

            write!(FastWrite(dst), "Content-Length: {}\r\n", content.content_length())?;
        }
        dst.put_slice(b"\r\n");

        if let Some(content) = item.content() {
            dst.put_slice(content.body());
        }
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// This is an optimization to avoid unnecessary bounds checking when writing
/// to the bytes buffer, since we've already reserved enough space.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
