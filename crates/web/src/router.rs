//! Route classification and dispatch.
//!
//! | target          | method    | route                 |
//! |-----------------|-----------|-----------------------|
//! | `/`             | any       | [`Route::Root`]       |
//! | `/echo/<msg>`   | any       | [`Route::Echo`]       |
//! | `/user-agent`   | any       | [`Route::UserAgent`]  |
//! | `/files/<name>` | GET       | [`Route::ReadFile`]   |
//! | `/files/<name>` | POST      | [`Route::WriteFile`]  |
//! | anything else   |           | [`Route::Unmatched`]  |

use crate::encoding::encoder::Encoder;
use crate::{FileStore, RouteError};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use petit_http::handler::Handler;
use petit_http::protocol::{Content, Request, Response};
use tracing::{debug, error, warn};

const ECHO_PREFIX: &str = "/echo/";
const FILES_PREFIX: &str = "/files/";

/// The behavior selected for a request, borrowed from its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'req> {
    Root,
    /// The target remainder after `/echo/`, verbatim.
    Echo(&'req str),
    UserAgent,
    /// The target remainder after `/files/`, verbatim.
    ReadFile(&'req str),
    WriteFile(&'req str),
    Unmatched,
}

impl<'req> Route<'req> {
    pub fn classify(method: &Method, target: &'req str) -> Self {
        match target {
            "/" => Route::Root,
            "/user-agent" => Route::UserAgent,
            _ => {
                if let Some(message) = target.strip_prefix(ECHO_PREFIX) {
                    Route::Echo(message)
                } else if let Some(name) = target.strip_prefix(FILES_PREFIX) {
                    match *method {
                        Method::GET => Route::ReadFile(name),
                        Method::POST => Route::WriteFile(name),
                        _ => Route::Unmatched,
                    }
                } else {
                    Route::Unmatched
                }
            }
        }
    }
}

/// Dispatches requests to the fixed route set. Holds no per-request state.
#[derive(Debug, Clone)]
pub struct Router {
    files: FileStore,
}

impl Router {
    pub fn new(files: FileStore) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub async fn dispatch(&self, request: &Request) -> Response {
        let route = Route::classify(request.method(), request.target());
        debug!(?route, "route request");

        match route {
            Route::Root => Response::ok(),
            Route::Echo(message) => echo(message, request.accept_encoding()),
            Route::UserAgent => {
                let user_agent = request.user_agent().map(Bytes::copy_from_slice).unwrap_or_default();
                Response::with_content(StatusCode::OK, Content::new(mime::TEXT_PLAIN, user_agent))
            }
            Route::ReadFile(name) => match self.files.read(name).await {
                Ok(contents) => Response::with_content(StatusCode::OK, Content::new(mime::APPLICATION_OCTET_STREAM, contents)),
                Err(e) => {
                    warn!(cause = %e, "file not served");
                    Response::empty(e.status())
                }
            },
            Route::WriteFile(name) => {
                let contents = request.body().map_or(&[][..], |body| &body[..]);
                match self.files.write(name, contents).await {
                    Ok(()) => Response::created(),
                    Err(e) => {
                        error!(cause = %e, "file not stored");
                        Response::empty(e.status())
                    }
                }
            }
            Route::Unmatched => Response::not_found(),
        }
    }
}

fn echo(message: &str, accept_encoding: Option<&[u8]>) -> Response {
    let body = message.as_bytes();

    let content = match Encoder::select(accept_encoding, body.len()) {
        Some(encoder) => {
            let coding = encoder.coding();
            match encoder.encode(body) {
                Ok(encoded) => Content::new(mime::TEXT_PLAIN, encoded).encoded(coding),
                Err(e) => {
                    error!(cause = %RouteError::from(e), "send echo body uncompressed");
                    Content::new(mime::TEXT_PLAIN, Bytes::copy_from_slice(body))
                }
            }
        }
        None => Content::new(mime::TEXT_PLAIN, Bytes::copy_from_slice(body)),
    };

    Response::with_content(StatusCode::OK, content)
}

#[async_trait]
impl Handler for Router {
    async fn call(&self, req: Request) -> Response {
        self.dispatch(&req).await
    }
}
