//! Response body encoding.
//!
//! Only gzip is negotiated. The client opts in by listing the `gzip` coding in
//! `Accept-Encoding`; any other coding is ignored.
//!
//! The main components are:
//! - `Writer`: an internal buffer collecting encoded data
//! - [`encoder`]: the gzip encoder, negotiation and the one-shot [`compress`] helper

use bytes::{Bytes, BytesMut};
use std::io;

pub mod encoder;

pub use encoder::{accepts_gzip, compress};

// inspired by from actix-http
pub(crate) struct Writer {
    buf: BytesMut,
}

impl Writer {
    fn with_capacity(capacity: usize) -> Self {
        Self { buf: BytesMut::with_capacity(capacity) }
    }

    fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

impl io::Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
