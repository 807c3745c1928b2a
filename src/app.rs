//! The postboard routing table.

use std::future::Future;
use std::sync::Arc;

use http::StatusCode;
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE, HeaderValue,
};

use crate::config::Config;
use crate::error::Error;
use crate::method::Method;
use crate::posts;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::server::Server;
use crate::store::{self, SharedStore};

pub const NO_SUCH_ROUTE: &str = "no such route";

/// Builds the router for the post service with `store` injected into every
/// handler.
///
/// | Method | Path | Handler |
/// |---|---|---|
/// | GET | `/posts` | [`posts::list`] |
/// | POST | `/posts` | [`posts::create`] |
/// | DELETE | `/posts` | [`posts::delete_all`] |
/// | DELETE | `/posts/{id}` | [`posts::delete_one`] |
/// | PATCH | `/posts/{id}` | [`posts::update_one`] |
/// | OPTIONS | any | empty 200 |
///
/// `{id}` is whatever follows the last `/`, query string included, and may
/// be empty (`/posts/`).
/// | anything else | | 404 envelope |
pub fn router(store: SharedStore) -> Router {
    let by_id = format!("/posts/{{*{}}}", posts::REST_PARAM);

    Router::new()
        .header(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization, Content-Length, X-Requested-With"),
        )
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"))
        .header(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("PATCH, POST, GET,OPTIONS,DELETE"),
        )
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .on(Method::Get, "/posts", with_store(&store, posts::list))
        .on(Method::Post, "/posts", with_store(&store, posts::create))
        .on(Method::Delete, "/posts", with_store(&store, posts::delete_all))
        .on(Method::Delete, &by_id, with_store(&store, posts::delete_one))
        .on(Method::Delete, "/posts/", with_store(&store, posts::delete_one))
        .on(Method::Patch, &by_id, with_store(&store, posts::update_one))
        .on(Method::Patch, "/posts/", with_store(&store, posts::update_one))
        .preflight(preflight)
        .fallback(no_such_route)
}

/// Opens the configured store and serves the post routes until shutdown.
pub async fn run(config: Config) -> Result<(), Error> {
    let store = store::open(&config.store).await?;
    Server::bind(config.listen_addr()).serve(router(store)).await
}

/// Binds a store-taking handler to a clone of `store`.
fn with_store<F, Fut>(store: &SharedStore, handler: F) -> impl Fn(Request) -> Fut + Send + Sync + 'static
where
    F: Fn(SharedStore, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    let store = Arc::clone(store);
    move |req| handler(Arc::clone(&store), req)
}

async fn preflight(_req: Request) -> Response {
    Response::empty(StatusCode::OK)
}

async fn no_such_route(_req: Request) -> Response {
    Response::failure(StatusCode::NOT_FOUND, NO_SUCH_ROUTE)
}
