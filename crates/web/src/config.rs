//! Command line and environment configuration of `petit-server`.

use crate::{Server, ServerBuilder};
use clap::Parser;
use petit_http::connection::DEFAULT_REQUEST_BUFFER_SIZE;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Debug, Clone, Parser)]
#[command(name = "petit-server")]
#[command(about = "Serves echo, user-agent and file routes over one-shot HTTP/1.1 connections")]
#[command(version)]
pub struct Config {
    /// Root directory of the `/files/` routes; must already exist
    #[arg(long, default_value = ".", env = "PETIT_DIRECTORY")]
    pub directory: PathBuf,

    #[arg(long, default_value = "0.0.0.0:4221", env = "PETIT_ADDRESS")]
    pub address: String,

    /// Close connections that send nothing within this many milliseconds
    #[arg(long = "read-timeout-ms", env = "PETIT_READ_TIMEOUT_MS")]
    pub read_timeout_ms: Option<u64>,

    /// Capacity of the buffer holding the whole request
    #[arg(long, default_value_t = DEFAULT_REQUEST_BUFFER_SIZE, env = "PETIT_BUFFER_SIZE", value_parser = parse_buffer_size)]
    pub buffer_size: usize,

    #[arg(long, default_value = "info", env = "PETIT_LOG_LEVEL")]
    pub log_level: Level,
}

impl Config {
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn server_builder(&self) -> ServerBuilder {
        Server::builder()
            .address(self.address.as_str())
            .directory(&self.directory)
            .read_timeout(self.read_timeout())
            .buffer_size(self.buffer_size)
    }
}

fn parse_buffer_size(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("buffer size must be greater than zero".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}
