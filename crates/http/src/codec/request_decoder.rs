//! HTTP request decoder
//!
//! Decodes the received bytes into a [`Request`]. The connection keeps reading
//! into one fixed-capacity buffer until [`RequestDecoder::is_complete`] holds, the
//! peer stops sending or the buffer is full; whatever arrived by then is all the
//! decoder ever sees.
//!
//! # Rules
//!
//! - The request line is mandatory. Without a complete `METHOD SP TARGET SP VERSION CRLF`
//!   decoding fails with [`ParseError::InvalidRequestLine`].
//! - Header lookup is by exact, case-sensitive name and the first occurrence wins.
//! - If the header section is not terminated by an empty line within the received
//!   bytes, the request keeps its request line and drops the headers. For methods
//!   that carry a body this fails with [`ParseError::InvalidHeader`] instead, since
//!   the body can't be located.
//! - For methods that carry a body, the body starts after the empty line. A
//!   `Content-Length` header bounds it, but never past the received bytes; without
//!   that header the body is every remaining received byte.
//!
//! # Example
//!
//! ```
//! use petit_http::codec::RequestDecoder;
//!
//! let mut buf = [0u8; 1024];
//! let raw = b"GET /echo/abc HTTP/1.1\r\nHost: x\r\n\r\n";
//! buf[..raw.len()].copy_from_slice(raw);
//!
//! let request = RequestDecoder.decode(&buf, raw.len()).unwrap();
//! assert_eq!(request.target(), "/echo/abc");
//! ```

use bytes::Bytes;
use http::{Method, Version};
use httparse::{Error, Status};
use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, Request, RequestHeader};

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

const HOST: &str = "Host";
const USER_AGENT: &str = "User-Agent";
const ACCEPT_ENCODING: &str = "Accept-Encoding";
const CONTENT_LENGTH: &str = "Content-Length";

/// Decoder turning the received bytes into a [`Request`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestDecoder;

impl RequestDecoder {
    /// Decodes `buf[..received]`.
    ///
    /// `received` is clamped to `buf.len()`; bytes past it are never looked at, so a
    /// zero-padded buffer is fine.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if:
    /// - no byte was received
    /// - the request line is missing, incomplete or malformed
    /// - a header line is malformed or there are more than `MAX_HEADER_NUM` headers
    /// - the `Content-Length` value of a body-carrying request is not a decimal number
    pub fn decode(&self, buf: &[u8], received: usize) -> Result<Request, ParseError> {
        let src = &buf[..received.min(buf.len())];
        ensure!(!src.is_empty(), ParseError::EmptyRequest);

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let status = req.parse(src).map_err(|e| match e {
            Error::TooManyHeaders => ParseError::too_many_headers(MAX_HEADER_NUM),
            Error::HeaderName | Error::HeaderValue => ParseError::invalid_header(e),
            e => ParseError::invalid_request_line(e),
        })?;

        let header = request_line(&req)?;

        match status {
            Status::Complete(body_offset) => {
                trace!(body_offset, header_count = req.headers.len(), "parsed request header");

                let parsed_headers = &*req.headers;
                let header = record_headers(header, parsed_headers);
                let body = if header.need_body() {
                    let content_length = content_length(parsed_headers)?;
                    Some(take_body(src, body_offset, content_length))
                } else {
                    None
                };

                Ok(header.body(body))
            }
            Status::Partial => {
                // the request line made it into the buffer but the header section did not end
                ensure!(
                    !header.need_body(),
                    ParseError::invalid_header(format!("header section of {} request exceeds {} bytes", header.method(), src.len()))
                );
                trace!(received = src.len(), "header section incomplete, keeping request line only");
                Ok(header.into())
            }
        }
    }

    /// Whether `src` already holds a whole request, so no more bytes need to be read.
    ///
    /// A request is whole once its header section has ended and, for methods that
    /// carry a body, the `Content-Length` bytes after it have arrived. Without
    /// `Content-Length` the end of the header section is enough. Bytes that can
    /// never parse also count as whole, since reading more can't fix them.
    pub fn is_complete(&self, src: &[u8]) -> bool {
        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADER_NUM];
        let mut req = httparse::Request::new(&mut headers);

        let body_offset = match req.parse(src) {
            Ok(Status::Complete(body_offset)) => body_offset,
            Ok(Status::Partial) => return false,
            Err(_) => return true,
        };

        match request_line(&req) {
            Ok(header) if header.need_body() => match content_length(&*req.headers) {
                Ok(Some(expected)) => src.len() - body_offset >= expected,
                Ok(None) | Err(_) => true,
            },
            _ => true,
        }
    }
}

fn request_line(req: &httparse::Request<'_, '_>) -> Result<RequestHeader, ParseError> {
    let (Some(method), Some(target), Some(version)) = (req.method, req.path, req.version) else {
        return Err(ParseError::invalid_request_line("incomplete request line"));
    };

    let method = Method::from_bytes(method.as_bytes()).map_err(ParseError::invalid_request_line)?;
    ensure!(target.starts_with('/'), ParseError::invalid_request_line(format!("target {target:?} is not a path")));

    let version = match version {
        0 => Version::HTTP_10,
        1 => Version::HTTP_11,
        v => return Err(ParseError::invalid_request_line(format!("unsupported http version 1.{v}"))),
    };

    Ok(RequestHeader::new(method, target, version))
}

fn record_headers(mut header: RequestHeader, headers: &[httparse::Header<'_>]) -> RequestHeader {
    if let Some(host) = first_header(headers, HOST) {
        header = header.with_host(Bytes::copy_from_slice(host));
    }
    if let Some(user_agent) = first_header(headers, USER_AGENT) {
        header = header.with_user_agent(Bytes::copy_from_slice(user_agent));
    }
    if let Some(accept_encoding) = first_header(headers, ACCEPT_ENCODING) {
        header = header.with_accept_encoding(Bytes::copy_from_slice(accept_encoding));
    }
    header
}

fn first_header<'buf>(headers: &[httparse::Header<'buf>], name: &str) -> Option<&'buf [u8]> {
    headers.iter().find(|header| header.name == name).map(|header| header.value)
}

fn content_length(headers: &[httparse::Header<'_>]) -> Result<Option<usize>, ParseError> {
    let Some(value) = first_header(headers, CONTENT_LENGTH) else {
        return Ok(None);
    };

    std::str::from_utf8(value)
        .ok()
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|s| s.parse::<usize>().ok())
        .map(Some)
        .ok_or_else(|| ParseError::invalid_content_length(String::from_utf8_lossy(value)))
}

fn take_body(src: &[u8], body_offset: usize, content_length: Option<usize>) -> Bytes {
    let remaining = &src[body_offset..];
    let length = match content_length {
        Some(expected) if expected > remaining.len() => {
            trace!(expected, received = remaining.len(), "body truncated to received bytes");
            remaining.len()
        }
        Some(expected) => expected,
        None => remaining.len(),
    };
    Bytes::copy_from_slice(&remaining[..length])
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn decode(raw: impl AsRef<[u8]>) -> Result<Request, ParseError> {
        let raw = raw.as_ref();
        let mut buf = [0u8; 1024];
        buf[..raw.len()].copy_from_slice(raw);
        RequestDecoder.decode(&buf, raw.len())
    }

    #[test]
    fn from_curl() {
        let str = indoc! {"
        GET /index.html HTTP/1.1\r
        Host: 127.0.0.1:4221\r
        User-Agent: curl/7.79.1\r
        Accept: */*\r
        \r
        "};

        let request = decode(str).unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.version(), Version::HTTP_11);
        assert_eq!(request.target(), "/index.html");
        assert_eq!(request.host(), Some(&b"127.0.0.1:4221"[..]));
        assert_eq!(request.user_agent(), Some(&b"curl/7.79.1"[..]));
        assert_eq!(request.accept_encoding(), None);
        assert_eq!(request.body(), None);
    }

    #[test]
    fn header_names_are_case_sensitive_and_first_wins() {
        let str = indoc! {"
        GET /user-agent HTTP/1.1\r
        user-agent: lower\r
        User-Agent: first\r
        User-Agent: second\r
        Accept-Encoding: gzip\r
        \r
        "};

        let request = decode(str).unwrap();

        assert_eq!(request.user_agent(), Some(&b"first"[..]));
        assert_eq!(request.accept_encoding(), Some(&b"gzip"[..]));
        assert_eq!(request.host(), None);
    }

    #[test]
    fn post_body_bounded_by_content_length() {
        let request = decode("POST /files/foo.txt HTTP/1.1\r\nHost: x\r\nContent-Length: 5\r\n\r\nhelloEXTRA").unwrap();

        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.body().map(|b| &b[..]), Some(&b"hello"[..]));
    }

    #[test]
    fn post_body_bounded_by_received_bytes() {
        let request = decode("POST /files/foo.txt HTTP/1.1\r\nContent-Length: 100\r\n\r\nhello").unwrap();

        assert_eq!(request.body().map(|b| &b[..]), Some(&b"hello"[..]));
    }

    #[test]
    fn post_body_without_content_length() {
        let request = decode(b"POST /files/bin HTTP/1.1\r\n\r\n\x00\x01\r\n\xff").unwrap();

        assert_eq!(request.body().map(|b| &b[..]), Some(&b"\x00\x01\r\n\xff"[..]));
    }

    #[test]
    fn post_without_body_has_empty_body() {
        let request = decode("POST /files/empty HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();

        assert_eq!(request.body().map(Bytes::len), Some(0));
    }

    #[test]
    fn get_ignores_trailing_bytes() {
        let request = decode("GET / HTTP/1.1\r\n\r\nleftover").unwrap();

        assert_eq!(request.body(), None);
    }

    #[test]
    fn invalid_content_length() {
        let result = decode("POST /files/a HTTP/1.1\r\nContent-Length: five\r\n\r\nhello");

        assert!(matches!(result, Err(ParseError::InvalidContentLength { .. })));
    }

    #[test]
    fn bytes_past_received_are_ignored() {
        let mut buf = [b'X'; 64];
        let raw = b"GET /echo/hi HTTP/1.1\r\n\r\n";
        buf[..raw.len()].copy_from_slice(raw);

        let request = RequestDecoder.decode(&buf, raw.len()).unwrap();

        assert_eq!(request.target(), "/echo/hi");
    }

    #[test]
    fn received_larger_than_buffer_is_clamped() {
        let raw = b"GET / HTTP/1.1\r\n\r\n";

        let request = RequestDecoder.decode(raw, 4096).unwrap();

        assert_eq!(request.target(), "/");
    }

    #[test]
    fn incomplete_header_section_of_post_is_rejected() {
        let result = decode("POST /files/keep HTTP/1.1\r\nContent-Length: 5\r\nUser-Agent: cu");

        assert!(matches!(result, Err(ParseError::InvalidHeader { .. })));
    }

    #[test]
    fn completeness() {
        let complete: [&[u8]; 5] = [
            b"GET / HTTP/1.1\r\n\r\n",
            b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello",
            b"POST /files/a HTTP/1.1\r\n\r\n",
            b"POST /files/a HTTP/1.1\r\nContent-Length: five\r\n\r\n",
            b"NONSENSE\r\n\r\n",
        ];
        for src in complete {
            assert!(RequestDecoder.is_complete(src), "{:?}", String::from_utf8_lossy(src));
        }

        let incomplete: [&[u8]; 4] = [
            b"GET / HTTP/1.1\r\n",
            b"GET /user-agent HTTP/1.1\r\nUser-Agent: cu",
            b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\n",
            b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhel",
        ];
        for src in incomplete {
            assert!(!RequestDecoder.is_complete(src), "{:?}", String::from_utf8_lossy(src));
        }
    }

    #[test]
    fn incomplete_header_section_keeps_request_line() {
        let request = decode("GET /user-agent HTTP/1.1\r\nUser-Agent: cut").unwrap();

        assert_eq!(request.target(), "/user-agent");
        assert_eq!(request.user_agent(), None);
    }

    #[test]
    fn malformed_request_lines() {
        for raw in ["hello", "GET\r\n\r\n", "GET /index.html\r\n\r\n", "GET /a HTTP/2.0\r\n\r\n", "GET index HTTP/1.1\r\n\r\n"] {
            let result = decode(raw);
            assert!(matches!(result, Err(ParseError::InvalidRequestLine { .. })), "{raw:?} -> {result:?}");
        }
    }

    #[test]
    fn empty_read() {
        let result = decode("");

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }
}
