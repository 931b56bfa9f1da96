//! Routes of the petit server, served over [`petit_http`].
//!
//! - [`router`]: classifies a request into a [`Route`] and builds its response
//! - [`encoding`]: gzip negotiation and compression of echo bodies
//! - [`files`]: the directory behind `/files/`
//! - [`server`]: builder and accept loop, one task per connection
//! - [`config`]: command line and environment configuration
//!
//! ```no_run
//! use petit_web::Server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::builder()
//!         .address("127.0.0.1:4221")
//!         .directory("/tmp/data")
//!         .build()
//!         .unwrap();
//!
//!     server.start().await.unwrap();
//! }
//! ```

pub mod config;
pub mod encoding;
pub mod files;
pub mod router;
pub mod server;

mod error;

pub use config::Config;
pub use error::RouteError;
pub use files::FileStore;
pub use router::{Route, Router};
pub use server::{Server, ServerBuildError, ServerBuilder};
