use crate::{FileStore, Router};
use petit_http::connection::{DEFAULT_REQUEST_BUFFER_SIZE, HttpConnection};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Debug)]
pub struct ServerBuilder {
    address: Option<io::Result<Vec<SocketAddr>>>,
    directory: Option<PathBuf>,
    read_timeout: Option<Duration>,
    buffer_size: usize,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { address: None, directory: None, read_timeout: None, buffer_size: DEFAULT_REQUEST_BUFFER_SIZE }
    }

    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(|addrs| addrs.collect()));
        self
    }

    /// Root directory of the `/files/` routes.
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    pub fn read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let address = self.address.ok_or(ServerBuildError::MissingAddress)?.map_err(ServerBuildError::invalid_address)?;
        if address.is_empty() {
            return Err(ServerBuildError::invalid_address("address resolves to nothing"));
        }
        let directory = self.directory.ok_or(ServerBuildError::MissingDirectory)?;
        if self.buffer_size == 0 {
            return Err(ServerBuildError::InvalidBufferSize);
        }

        Ok(Server {
            router: Arc::new(Router::new(FileStore::new(directory))),
            address,
            read_timeout: self.read_timeout,
            buffer_size: self.buffer_size,
        })
    }
}

#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    address: Vec<SocketAddr>,
    read_timeout: Option<Duration>,
    buffer_size: usize,
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("address must be set")]
    MissingAddress,
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },
    #[error("directory must be set")]
    MissingDirectory,
    #[error("buffer size must be greater than zero")]
    InvalidBufferSize,
}

impl ServerBuildError {
    fn invalid_address<S: ToString>(str: S) -> Self {
        Self::InvalidAddress { reason: str.to_string() }
    }
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Binds the configured address and serves until the process ends.
    pub async fn start(self) -> io::Result<()> {
        info!("start listening at {:?}", self.address);
        let tcp_listener = match TcpListener::bind(self.address.as_slice()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(e);
            }
        };

        self.serve(tcp_listener).await;
        Ok(())
    }

    /// Serves connections accepted from an already bound listener, one task each.
    pub async fn serve(self, tcp_listener: TcpListener) {
        info!(
            directory = ?self.router.files().root(),
            buffer_size = self.buffer_size,
            read_timeout = ?self.read_timeout,
            "accepting connections"
        );

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let router = Arc::clone(&self.router);
            let (read_timeout, buffer_size) = (self.read_timeout, self.buffer_size);

            tokio::spawn(async move {
                let (reader, writer) = tcp_stream.into_split();
                let connection =
                    HttpConnection::with_capacity(reader, writer, buffer_size).read_timeout(read_timeout);
                match connection.process(router).await {
                    Ok(()) => {
                        info!(%remote_addr, "finished process, connection shutdown");
                    }
                    Err(e) => {
                        error!(%remote_addr, "service has error, cause {}, connection shutdown", e);
                    }
                }
            });
        }
    }
}
