use std::sync::Arc;
use std::time::Duration;

use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::{debug, error, info, trace, warn};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, ParseError, Response, SendError};

/// Capacity of the buffer holding the whole request
pub const DEFAULT_REQUEST_BUFFER_SIZE: usize = 1024;

/// A one-shot HTTP connection: one request, one response.
///
/// The request must fit in `buffer_size` bytes. The connection reads until the
/// request is whole, the peer stops sending or the buffer is full, then never
/// reads again. It never keeps the socket alive and never pipelines.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: R,
    writer: W,
    buffer_size: usize,
    read_timeout: Option<Duration>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_capacity(reader, writer, DEFAULT_REQUEST_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, writer: W, buffer_size: usize) -> Self {
        Self { reader, writer, buffer_size, read_timeout: None }
    }

    /// Closes the connection without a response if the request isn't whole within `timeout`.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Reads one request, hands it to `handler` and writes the response.
    ///
    /// A request that can't be decoded gets a `400 Bad Request`; the decode error is
    /// still returned so the caller can log it.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler + ?Sized,
    {
        let request = {
            let mut buf = vec![0u8; self.buffer_size];
            let received = self.read_request(&mut buf).await?;
            debug!(received, capacity = self.buffer_size, "received request bytes");
            RequestDecoder.decode(&buf, received)
        };

        match request {
            Ok(request) => {
                info!(method = %request.method(), target = request.target(), "receive request");
                let response = handler.call(request).await;
                self.send_response(&response).await
            }

            Err(ParseError::EmptyRequest) => {
                info!("cant read any request, break this connection down");
                Ok(())
            }

            Err(e) => {
                error!("can't decode request, cause {}", e);
                self.send_response(&Response::empty(StatusCode::BAD_REQUEST)).await?;
                Err(e.into())
            }
        }
    }

    async fn read_request(&mut self, buf: &mut [u8]) -> Result<usize, ParseError> {
        match self.read_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, self.fill(buf)).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    warn!(timeout_ms = timeout.as_millis(), "no complete request received in time");
                    Err(ParseError::timeout(timeout))
                }
            },
            None => self.fill(buf).await,
        }
    }

    /// Reads into `buf` until the request is whole, the peer stops sending or `buf` is full.
    async fn fill(&mut self, buf: &mut [u8]) -> Result<usize, ParseError> {
        let mut filled = 0;
        while filled < buf.len() {
            let read = self.reader.read(&mut buf[filled..]).await?;
            if read == 0 {
                break;
            }
            filled += read;
            trace!(read, filled, "read request bytes");

            if RequestDecoder.is_complete(&buf[..filled]) {
                break;
            }
        }
        Ok(filled)
    }

    async fn send_response(&mut self, response: &Response) -> Result<(), HttpError> {
        let mut dst = BytesMut::new();
        ResponseEncoder::new().encode(response, &mut dst)?;

        self.writer.write_all(&dst).await.map_err(SendError::io)?;
        self.writer.flush().await.map_err(SendError::io)?;
        self.writer.shutdown().await.map_err(SendError::io)?;

        info!(status = response.status().as_u16(), length = dst.len(), "sent response");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::make_handler;
    use crate::protocol::{Content, Request};
    use std::io;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    // hands out `read_data` at most `max_read` bytes per read, records everything written
    #[derive(Clone)]
    struct MockIO {
        read_data: Vec<u8>,
        write_data: Arc<Mutex<Vec<u8>>>,
        read_pos: usize,
        max_read: usize,
    }

    impl MockIO {
        fn new(read_data: &[u8]) -> Self {
            Self::chunked(read_data, usize::MAX)
        }

        fn chunked(read_data: &[u8], max_read: usize) -> Self {
            Self { read_data: read_data.to_vec(), write_data: Arc::default(), read_pos: 0, max_read }
        }

        fn written(&self) -> Vec<u8> {
            self.write_data.lock().unwrap().clone()
        }
    }

    impl AsyncRead for MockIO {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let remaining = &self.read_data[self.read_pos..];
            let amt = remaining.len().min(buf.remaining()).min(self.max_read);
            buf.put_slice(&remaining[..amt]);
            self.read_pos += amt;
            Poll::Ready(Ok(()))
        }
    }

    impl AsyncWrite for MockIO {
        fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize, io::Error>> {
            self.write_data.lock().unwrap().extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
            Poll::Ready(Ok(()))
        }
    }

    async fn echo_target(request: Request) -> Response {
        Response::with_content(StatusCode::OK, Content::new(mime::TEXT_PLAIN, request.target().to_owned()))
    }

    async fn run(raw: &[u8]) -> (Result<(), HttpError>, Vec<u8>) {
        let io = MockIO::new(raw);
        let connection = HttpConnection::new(io.clone(), io.clone());
        let result = connection.process(Arc::new(make_handler(echo_target))).await;
        (result, io.written())
    }

    #[tokio::test]
    async fn one_request_one_response() {
        let (result, written) = run(b"GET /hello HTTP/1.1\r\nHost: x\r\n\r\n").await;

        assert!(result.is_ok());
        assert_eq!(&written[..], b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 6\r\n\r\n/hello");
    }

    #[tokio::test]
    async fn malformed_request_gets_bad_request() {
        let (result, written) = run(b"NONSENSE\r\n\r\n").await;

        assert!(matches!(result, Err(HttpError::RequestError { .. })));
        assert_eq!(&written[..], b"HTTP/1.1 400 Bad Request\r\n\r\n");
    }

    #[tokio::test]
    async fn closed_connection_gets_nothing() {
        let (result, written) = run(b"").await;

        assert!(result.is_ok());
        assert!(written.is_empty());
    }

    #[tokio::test]
    async fn request_larger_than_buffer_is_truncated() {
        let io = MockIO::new(b"POST /files/a HTTP/1.1\r\nContent-Length: 10\r\n\r\n0123456789");
        let connection = HttpConnection::with_capacity(io.clone(), io.clone(), 48);

        let body_len = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&body_len);
        let handler = make_handler(move |request: Request| {
            let seen = Arc::clone(&seen);
            async move {
                *seen.lock().unwrap() = request.body().map(bytes::Bytes::len);
                Response::created()
            }
        });

        connection.process(Arc::new(handler)).await.unwrap();

        assert_eq!(*body_len.lock().unwrap(), Some(2));
        assert_eq!(&io.written()[..], b"HTTP/1.1 201 Created\r\n\r\n");
    }

    #[tokio::test]
    async fn request_spread_over_reads() {
        let raw = b"POST /files/a HTTP/1.1\r\nUser-Agent: split/1.0\r\nContent-Length: 5\r\n\r\nhello";
        let header_len = raw.len() - 5;

        for max_read in [1, 7, header_len] {
            let io = MockIO::chunked(raw, max_read);
            let connection = HttpConnection::new(io.clone(), io.clone());

            let seen = Arc::new(Mutex::new(None));
            let recorded = Arc::clone(&seen);
            let handler = make_handler(move |request: Request| {
                let recorded = Arc::clone(&recorded);
                async move {
                    *recorded.lock().unwrap() = Some(request);
                    Response::created()
                }
            });

            connection.process(Arc::new(handler)).await.unwrap();

            let request = seen.lock().unwrap().take().unwrap();
            assert_eq!(request.user_agent(), Some(&b"split/1.0"[..]), "max_read {max_read}");
            assert_eq!(request.body().map(|b| &b[..]), Some(&b"hello"[..]), "max_read {max_read}");
            assert_eq!(&io.written()[..], b"HTTP/1.1 201 Created\r\n\r\n");
        }
    }

    #[tokio::test]
    async fn oversized_post_header_gets_bad_request() {
        let io = MockIO::new(b"POST /files/a HTTP/1.1\r\nUser-Agent: a-rather-long-agent\r\nContent-Length: 5\r\n\r\nhello");
        let connection = HttpConnection::with_capacity(io.clone(), io.clone(), 40);

        let result = connection.process(Arc::new(make_handler(echo_target))).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::InvalidHeader { .. } })));
        assert_eq!(&io.written()[..], b"HTTP/1.1 400 Bad Request\r\n\r\n");
    }

    #[tokio::test]
    async fn stops_reading_once_request_is_whole() {
        let (mut client, server) = tokio::io::duplex(256);
        let (reader, writer) = tokio::io::split(server);
        let connection = HttpConnection::new(reader, writer);

        client.write_all(b"GET /echo HTTP/1.1\r\n").await.unwrap();
        let serving = tokio::spawn(connection.process(Arc::new(make_handler(echo_target))));
        tokio::task::yield_now().await;
        client.write_all(b"Host: x\r\n\r\n").await.unwrap();

        // the client never closes its side, so this only finishes if reading stopped at the blank line
        serving.await.unwrap().unwrap();
        let mut response = Vec::new();
        client.read_to_end(&mut response).await.unwrap();
        assert_eq!(&response[..], b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\n/echo");
    }

    #[tokio::test]
    async fn partial_request_times_out() {
        let (mut client, server) = tokio::io::duplex(64);
        let (reader, writer) = tokio::io::split(server);
        let connection = HttpConnection::new(reader, writer).read_timeout(Some(Duration::from_millis(20)));

        client.write_all(b"POST /files/a HTTP/1.1\r\nContent-Length: 5\r\n\r\nhe").await.unwrap();
        let result = connection.process(Arc::new(make_handler(echo_target))).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::Timeout { .. } })));
    }

    #[tokio::test]
    async fn silent_peer_times_out() {
        let (client, server) = tokio::io::duplex(64);
        let (reader, writer) = tokio::io::split(server);
        let connection = HttpConnection::new(reader, writer).read_timeout(Some(Duration::from_millis(20)));

        let result = connection.process(Arc::new(make_handler(echo_target))).await;

        assert!(matches!(result, Err(HttpError::RequestError { source: ParseError::Timeout { .. } })));
        drop(client);
    }
}
