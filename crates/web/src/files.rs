//! Files served under `/files/`.
//!
//! A name is appended to the root directory as is: no normalization, no check for
//! `..` segments. The root must already exist; nothing here creates it.
//!
//! Reads and writes of the same name from concurrent connections are not
//! coordinated. The last writer wins and a reader may see a partially written file.

use crate::RouteError;
use bytes::Bytes;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a name to `<root>/<name>`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        let mut path = OsString::from(self.root.as_os_str());
        if !path.as_encoded_bytes().ends_with(b"/") {
            path.push("/");
        }
        path.push(name);
        PathBuf::from(path)
    }

    /// Reads the whole file.
    ///
    /// A file that can't be opened or read, or that holds zero bytes, counts as not found.
    pub async fn read(&self, name: &str) -> Result<Bytes, RouteError> {
        let path = self.resolve(name);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(source) => return Err(RouteError::FileNotFound { path, source }),
        };

        if contents.is_empty() {
            return Err(RouteError::EmptyFile { path });
        }

        debug!(path = ?path, length = contents.len(), "read file");
        Ok(Bytes::from(contents))
    }

    /// Creates or truncates the file and writes `contents` verbatim.
    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<(), RouteError> {
        let path = self.resolve(name);
        match tokio::fs::write(&path, contents).await {
            Ok(()) => {
                debug!(path = ?path, length = contents.len(), "wrote file");
                Ok(())
            }
            Err(source) => Err(RouteError::FileWrite { path, source }),
        }
    }
}
