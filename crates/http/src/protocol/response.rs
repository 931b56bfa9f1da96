//! HTTP response representation.
//!
//! A [`Response`] is a status plus optional [`Content`]. There is no
//! `Content-Length` field: the encoder derives it from the body it writes, so
//! the advertised length always matches the transmitted bytes.

use bytes::Bytes;
use http::StatusCode;
use mime::Mime;

/// Content codings a response body may be transmitted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEncoding {
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentEncoding::Gzip => "gzip",
        }
    }
}

/// A response body together with the headers that describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    content_type: Mime,
    encoding: Option<ContentEncoding>,
    body: Bytes,
}

impl Content {
    pub fn new(content_type: Mime, body: impl Into<Bytes>) -> Self {
        Self { content_type, encoding: None, body: body.into() }
    }

    /// Marks the body as already encoded with `encoding`.
    #[must_use]
    pub fn encoded(mut self, encoding: ContentEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn content_type(&self) -> &Mime {
        &self.content_type
    }

    pub fn encoding(&self) -> Option<ContentEncoding> {
        self.encoding
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The value sent as `Content-Length`.
    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    content: Option<Content>,
}

impl Response {
    /// A response with a status line only: no headers and no body.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, content: None }
    }

    pub fn with_content(status: StatusCode, content: Content) -> Self {
        Self { status, content: Some(content) }
    }

    pub fn ok() -> Self {
        Self::empty(StatusCode::OK)
    }

    pub fn created() -> Self {
        Self::empty(StatusCode::CREATED)
    }

    pub fn not_found() -> Self {
        Self::empty(StatusCode::NOT_FOUND)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    /// Returns the body, empty when the response carries no content.
    pub fn body(&self) -> &[u8] {
        self.content.as_ref().map_or(&[], |content| content.body().as_ref())
    }
}
