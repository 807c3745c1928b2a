//! Outgoing HTTP response type, the JSON envelope, and the [`IntoResponse`]
//! conversion trait.
//!
//! Every body this service writes is an envelope:
//!
//! ```text
//! {"status":"success", "<field>": <value>}
//! {"status":"false",   "message": "<text>"}
//! ```
//!
//! Preflight answers are the only responses without a body.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use serde::ser::SerializeMap;
use tracing::error;

// ── Envelope ──────────────────────────────────────────────────────────────────

/// `{"status":"success", <field>: <value>}` with `status` always first.
struct Success<'a, T> {
    field: &'a str,
    value: &'a T,
}

impl<T: Serialize> Serialize for Success<'_, T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("status", "success")?;
        map.serialize_entry(self.field, self.value)?;
        map.end()
    }
}

#[derive(Serialize)]
struct Failure<'a> {
    status: &'static str,
    message: &'a str,
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use postboard::Response;
/// use http::StatusCode;
///
/// Response::success("data", &serde_json::Value::Null);
/// Response::failure(StatusCode::BAD_REQUEST, "no such post id");
/// Response::empty(StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct Response {
    pub(crate) body: Bytes,
    pub(crate) headers: HeaderMap,
    pub(crate) status: StatusCode,
}

impl Response {
    /// `200 OK` — `{"status":"success", field: value}`.
    pub fn success<T: Serialize>(field: &str, value: &T) -> Self {
        match serde_json::to_vec(&Success { field, value }) {
            Ok(bytes) => Self::json(StatusCode::OK, bytes),
            Err(e) => {
                error!(field, "failed to serialise response: {e}");
                Self::failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
            }
        }
    }

    /// `{"status":"false", "message": message}` with the given status.
    pub fn failure(status: StatusCode, message: &str) -> Self {
        let bytes = serde_json::to_vec(&Failure { status: "false", message })
            .unwrap_or_else(|_| br#"{"status":"false"}"#.to_vec());
        Self::json(status, bytes)
    }

    /// Response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self { body: Bytes::new(), headers: HeaderMap::new(), status }
    }

    /// Raw JSON bytes with `content-type: application/json`.
    pub fn json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self { body: body.into(), headers, status }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into a hyper response, filling in any of `defaults` the
    /// handler did not set itself.
    pub(crate) fn into_inner(self, defaults: &HeaderMap) -> http::Response<Full<Bytes>> {
        let mut headers = self.headers;
        for (name, value) in defaults {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = headers;
        res
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

/// Return a bare status from a handler: `return StatusCode::OK`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::empty(self) }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}
