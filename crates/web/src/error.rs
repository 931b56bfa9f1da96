use http::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures a route can run into. Each one still ends in a response.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("can't read file {path:?}: {source}")]
    FileNotFound { path: PathBuf, source: io::Error },

    #[error("file {path:?} is empty")]
    EmptyFile { path: PathBuf },

    #[error("can't write file {path:?}: {source}")]
    FileWrite { path: PathBuf, source: io::Error },

    /// Only logged: the echo route falls back to an uncompressed body and still answers 200.
    #[error("compress response body error: {source}")]
    Compression {
        #[from]
        source: io::Error,
    },
}

impl RouteError {
    /// The status answered when this error ends a request.
    ///
    /// [`RouteError::Compression`] never ends a request; its 500 only applies to
    /// callers that choose to fail instead of falling back.
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::FileNotFound { .. } | RouteError::EmptyFile { .. } => StatusCode::NOT_FOUND,
            RouteError::FileWrite { .. } | RouteError::Compression { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let missing = RouteError::FileNotFound { path: PathBuf::from("/tmp/none"), source: io::ErrorKind::NotFound.into() };
        let empty = RouteError::EmptyFile { path: PathBuf::from("/tmp/empty") };
        let write = RouteError::FileWrite { path: PathBuf::from("/tmp/ro"), source: io::ErrorKind::PermissionDenied.into() };
        let compression = RouteError::from(io::Error::other("deflate"));

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(empty.status(), StatusCode::NOT_FOUND);
        assert_eq!(write.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(compression.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
