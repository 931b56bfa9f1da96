//! HTTP request representation.
//!
//! A [`Request`] owns every field it exposes: the decoder copies the request
//! line, the few header values routing needs, and the body out of the receive
//! buffer, so the buffer can be released as soon as decoding returns.

use bytes::Bytes;
use http::{Method, Version};

/// The request line plus the header values this server looks at.
///
/// Header values are kept as raw bytes; only the first occurrence of each
/// header name (matched case-sensitively) is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    method: Method,
    target: String,
    version: Version,
    host: Option<Bytes>,
    user_agent: Option<Bytes>,
    accept_encoding: Option<Bytes>,
}

impl RequestHeader {
    /// Creates a header holding only the request line.
    pub fn new(method: Method, target: impl Into<String>, version: Version) -> Self {
        Self { method, target: target.into(), version, host: None, user_agent: None, accept_encoding: None }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<Bytes>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<Bytes>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn with_accept_encoding(mut self, accept_encoding: impl Into<Bytes>) -> Self {
        self.accept_encoding = Some(accept_encoding.into());
        self
    }

    /// Attaches a body to this header, converting it into a full [`Request`].
    pub fn body(self, body: Option<Bytes>) -> Request {
        Request { header: self, body }
    }

    /// Returns a reference to the request's HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request target exactly as it appeared on the request line.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the request's HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn host(&self) -> Option<&[u8]> {
        self.host.as_deref()
    }

    pub fn user_agent(&self) -> Option<&[u8]> {
        self.user_agent.as_deref()
    }

    pub fn accept_encoding(&self) -> Option<&[u8]> {
        self.accept_encoding.as_deref()
    }

    /// Determines if this request carries a body based on its HTTP method.
    ///
    /// Returns false for methods that typically don't have bodies:
    /// - GET
    /// - HEAD
    /// - DELETE
    /// - OPTIONS
    /// - CONNECT
    pub fn need_body(&self) -> bool {
        !matches!(self.method(), &Method::GET | &Method::HEAD | &Method::DELETE | &Method::OPTIONS | &Method::CONNECT)
    }
}

/// A decoded request: header plus the body, if the method carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    header: RequestHeader,
    body: Option<Bytes>,
}

impl Request {
    pub fn header(&self) -> &RequestHeader {
        &self.header
    }

    pub fn method(&self) -> &Method {
        self.header.method()
    }

    pub fn target(&self) -> &str {
        self.header.target()
    }

    pub fn version(&self) -> Version {
        self.header.version()
    }

    pub fn host(&self) -> Option<&[u8]> {
        self.header.host()
    }

    pub fn user_agent(&self) -> Option<&[u8]> {
        self.header.user_agent()
    }

    pub fn accept_encoding(&self) -> Option<&[u8]> {
        self.header.accept_encoding()
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn into_parts(self) -> (RequestHeader, Option<Bytes>) {
        (self.header, self.body)
    }
}

impl From<RequestHeader> for Request {
    fn from(header: RequestHeader) -> Self {
        Self { header, body: None }
    }
}
