use crate::encoding::Writer;
use bytes::Bytes;
use flate2::Compression;
use flate2::write::GzEncoder;
use petit_http::protocol::ContentEncoding;
use std::io;
use std::io::Write;
use tracing::trace;

/// gzip header and trailer overhead, reserved up front
const GZIP_FRAME_SIZE: usize = 32;

/// Represents the content encodings this server can produce.
pub(crate) enum Encoder {
    /// Gzip encoding.
    Gzip(GzEncoder<Writer>),
}

impl Encoder {
    /// Creates a new Gzip encoder at the default compression level.
    fn gzip(size_hint: usize) -> Self {
        Self::Gzip(GzEncoder::new(Writer::with_capacity(size_hint + GZIP_FRAME_SIZE), Compression::default()))
    }

    /// Selects an encoder based on the `Accept-Encoding` header.
    pub(crate) fn select(accept_encoding: Option<&[u8]>, size_hint: usize) -> Option<Self> {
        accepts_gzip(accept_encoding).then(|| Self::gzip(size_hint))
    }

    /// Returns the coding announced in `Content-Encoding`.
    pub(crate) fn coding(&self) -> ContentEncoding {
        match self {
            Encoder::Gzip(_) => ContentEncoding::Gzip,
        }
    }

    /// Writes data to the encoder.
    fn write(&mut self, data: &[u8]) -> Result<(), io::Error> {
        match self {
            Self::Gzip(encoder) => encoder.write_all(data).inspect_err(|err| {
                trace!("Error encoding gzip encoding: {}", err);
            }),
        }
    }

    /// Finishes the encoding process and returns the encoded data.
    fn finish(self) -> Result<Bytes, io::Error> {
        match self {
            Self::Gzip(encoder) => encoder.finish().map(Writer::into_bytes),
        }
    }

    /// Encodes `data` as one complete stream.
    pub(crate) fn encode(mut self, data: &[u8]) -> Result<Bytes, io::Error> {
        self.write(data)?;
        self.finish()
    }
}

/// Whether an `Accept-Encoding` value lists the `gzip` coding.
///
/// Codings are split on `,`, parameters after `;` are ignored and names compare
/// case-insensitively.
pub fn accepts_gzip(accept_encoding: Option<&[u8]>) -> bool {
    accept_encoding.is_some_and(|value| {
        value.split(|b| *b == b',').any(|coding| {
            let name = coding.split(|b| *b == b';').next().unwrap_or_default();
            name.trim_ascii().eq_ignore_ascii_case(b"gzip")
        })
    })
}

/// Compresses `data` into a complete gzip stream.
///
/// The compressed length is the length of the returned bytes. Empty input yields a
/// valid gzip stream of an empty payload.
pub fn compress(data: &[u8]) -> Result<Bytes, io::Error> {
    Encoder::gzip(data.len()).encode(data)
}
