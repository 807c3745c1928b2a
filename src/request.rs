//! Incoming HTTP request type.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::body::{self, Body, BodyError};

/// An incoming HTTP request.
///
/// `path` is the request target as sent: path plus any query string. The
/// body is left unread until a handler asks for it with
/// [`text`](Request::text) or [`json`](Request::json).
pub struct Request {
    pub(crate) path: String,
    pub(crate) params: HashMap<String, String>,
    pub(crate) body: Body,
}

impl Request {
    pub(crate) fn new(path: String, params: HashMap<String, String>, body: Body) -> Self {
        Self { path, params, body }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{*rest}`, `req.param("rest")` on `/posts/a/b`
    /// returns `Some("a/b")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Waits for the whole body and decodes it as UTF-8.
    pub async fn text(self) -> Result<String, BodyError> {
        let bytes = body::accumulate(self.body).await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Waits for the whole body and parses it as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, BodyError> {
        let text = self.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
