//! Handler-facing side of dispatch.
//!
//! A [`Handler`] receives a [`Request`] whose params are already populated and
//! a [`Response`] that wraps the transport's sink. Any `Fn(Request, Response)`
//! closure returning a `Send` future of `Result<()>` is a handler.

pub mod request;
pub mod response;

use std::future::Future;

use futures::future::BoxFuture;

use crate::Result;

pub use request::{Body, Params, Request};
pub use response::{Payload, Response};

pub trait Handler: Send + Sync + 'static {
    /// Handle one request. Errors are not caught by the router.
    fn call(&self, request: Request, response: Response) -> BoxFuture<'_, Result<()>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request, Response) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn call(&self, request: Request, response: Response) -> BoxFuture<'_, Result<()>> {
        Box::pin((self)(request, response))
    }
}
