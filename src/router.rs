//! Radix-tree request router.
//!
//! One tree per HTTP method. Lookup order for a request:
//!
//! 1. the tree for its method, matched against the request target exactly as
//!    sent, query string included (`/posts?x=1` is not `/posts`);
//! 2. the preflight handler, if the method is `OPTIONS`;
//! 3. the fallback handler.
//!
//! Whatever comes back gets the router's default headers for any header the
//! handler did not set.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body::Body as HttpBody;
use http_body_util::Full;
use matchit::Router as MatchitRouter;
use tracing::debug;

use crate::body::{self, BoxError};
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup and hand it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    preflight: Option<BoxedHandler>,
    fallback: Option<BoxedHandler>,
    default_headers: HeaderMap,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            preflight: None,
            fallback: None,
            default_headers: HeaderMap::new(),
        }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Paths use matchit syntax: `{name}` for one segment, `{*name}` for the
    /// rest of the path.
    ///
    /// # Panics
    ///
    /// Panics if `path` conflicts with a route already registered for
    /// `method`. Routes are fixed at startup, so this is a programming error.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, Arc::new(handler) as BoxedHandler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Handler for any `OPTIONS` request that no route claimed, whatever the path.
    pub fn preflight(mut self, handler: impl Handler) -> Self {
        self.preflight = Some(Arc::new(handler) as BoxedHandler);
        self
    }

    /// Handler for everything else. Without one the router answers a bare 404.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(Arc::new(handler) as BoxedHandler);
        self
    }

    /// Header added to every response that does not already carry it.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }

    /// Routes one request and produces one response.
    ///
    /// Never fails: anything unroutable becomes the fallback response.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<Full<Bytes>>
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();
        let path = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_owned(), |pq| pq.as_str().to_owned());

        let routed = match Method::try_from(&parts.method) {
            Ok(m) => Some(m),
            Err(e) => {
                debug!("{e}");
                None
            }
        };

        let (handler, params) = match routed.and_then(|m| self.lookup(m, &path)) {
            Some(found) => found,
            None => match (&self.preflight, routed) {
                (Some(preflight), Some(Method::Options)) => {
                    (Arc::clone(preflight), HashMap::new())
                }
                _ => match &self.fallback {
                    Some(fallback) => (Arc::clone(fallback), HashMap::new()),
                    None => {
                        return Response::empty(StatusCode::NOT_FOUND)
                            .into_inner(&self.default_headers);
                    }
                },
            },
        };

        let req = Request::new(path, params, body::boxed(body));
        handler.call(req).await.into_inner(&self.default_headers)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
