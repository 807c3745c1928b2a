//! Route handlers.
//!
//! A handler is anything callable as `Fn(Request) -> impl Future` whose
//! output converts into a [`Response`]. The router stores them as
//! `Arc<dyn Handler>` and every call returns a boxed future, so the
//! closures built in `app.rs` (each capturing its own store handle) sit in
//! the same table as plain `async fn`s.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// Future returned by [`Handler::call`].
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A handler shared by every connection task.
pub(crate) type BoxedHandler = Arc<dyn Handler>;

/// Turns one request into one response.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> HandlerFuture;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send,
{
    fn call(&self, req: Request) -> HandlerFuture {
        let fut = (self)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test]
    async fn closures_and_fns_share_one_table() {
        async fn teapot(_req: Request) -> StatusCode {
            StatusCode::IM_A_TEAPOT
        }

        let label = Arc::new("shared".to_owned());
        let handlers: Vec<BoxedHandler> = vec![
            Arc::new(teapot),
            Arc::new(move |_req: Request| {
                let label = Arc::clone(&label);
                async move { Response::failure(StatusCode::BAD_REQUEST, &label) }
            }),
        ];

        let empty = || crate::body::boxed(http_body_util::Empty::<bytes::Bytes>::new());
        let first = handlers[0].call(Request::new("/".into(), Default::default(), empty())).await;
        let second = handlers[1].call(Request::new("/".into(), Default::default(), empty())).await;
        assert_eq!(first.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }
}
