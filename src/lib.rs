//! # postboard
//!
//! A small JSON service for one resource, the post, kept in MongoDB.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/posts` | `{"status":"success","post":[...]}` |
//! | POST | `/posts` | `{"status":"success","data":{...}}` |
//! | DELETE | `/posts` | `{"status":"success","posts":[]}` |
//! | DELETE | `/posts/{id}` | `{"status":"success","data":null}` |
//! | PATCH | `/posts/{id}` | `{"status":"success","data":{...}}` |
//! | OPTIONS | any | empty 200 |
//!
//! Anything else is `404 {"status":"false","message":"no such route"}`.
//! Every response carries permissive CORS headers.
//!
//! ## Layers
//!
//! - [`Router`] — one radix tree per method, plus a preflight handler and a
//!   fallback
//! - [`posts`] — the five handlers, each talking to a [`PostStore`]
//! - [`Server`] — tokio + hyper accept loop with graceful shutdown
//!
//! ## Running in-process
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use postboard::{MemoryStore, Server, app};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = app::router(Arc::new(MemoryStore::new()));
//!     Server::bind(([127, 0, 0, 1], 3000).into()).serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod app;
pub mod body;
pub mod config;
pub mod post;
pub mod posts;
pub mod store;

pub use config::Config;
pub use error::Error;
pub use handler::{Handler, HandlerFuture};
pub use method::{Method, UnknownMethod};
pub use post::{NewPost, Post, PostPatch};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::{Server, serve_listener};
pub use store::{MemoryStore, MongoStore, PostStore, SharedStore, StoreError};
