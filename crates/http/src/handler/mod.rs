use std::future::Future;

use async_trait::async_trait;

use crate::protocol::{Request, Response};

/// Turns a decoded request into a response.
///
/// Handlers are infallible: every failure they meet must already be mapped to a
/// [`Response`], so a connection always has something to send back.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: Request) -> Response;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Response> + Send,
{
    async fn call(&self, req: Request) -> Response {
        (self.f)(req).await
    }
}

pub fn make_handler<F, Ret>(f: F) -> HandlerFn<F>
where
    Ret: Future<Output = Response>,
    F: Fn(Request) -> Ret,
{
    HandlerFn { f }
}
