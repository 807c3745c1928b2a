//! CRUD handlers for `/posts`.
//!
//! Every handler makes at most one logical store call (delete-all and
//! update-one read back afterwards) and answers with one envelope. Failures
//! the client caused are 400s; store failures other than a malformed id are
//! logged and answered with a 500.

use http::StatusCode;
use serde_json::Value;
use tracing::{debug, error};

use crate::post::{NewPost, PostPatch};
use crate::request::Request;
use crate::response::Response;
use crate::store::{SharedStore, StoreError};

pub const MISSING_CONTENT: &str = "field not filled in correctly, or no such post id";
pub const NO_SUCH_POST: &str = "no such post id";
pub const BAD_POST_ID: &str = "post id format incorrect";
pub const BAD_PATCH: &str = "field not filled in correctly, or post id format incorrect";

/// Name of the catch-all parameter on `/posts/{*rest}`.
pub const REST_PARAM: &str = "rest";

fn bad_request(message: &str) -> Response {
    Response::failure(StatusCode::BAD_REQUEST, message)
}

fn store_failure(op: &'static str, e: StoreError) -> Response {
    error!(op, "store error: {e}");
    Response::failure(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
}

/// The post id is the last `/`-separated segment of the request target,
/// query string included. `/posts/` and any trailing slash give an empty id.
fn post_id(req: &Request) -> String {
    req.param(REST_PARAM)
        .and_then(|rest| rest.rsplit('/').next())
        .unwrap_or_default()
        .to_owned()
}

/// `GET /posts`
pub async fn list(store: SharedStore, _req: Request) -> Response {
    match store.find_all().await {
        Ok(posts) => Response::success("post", &posts),
        Err(e) => store_failure("find_all", e),
    }
}

/// `POST /posts`
///
/// The body must be a JSON object. Only checks that `content` is present;
/// an empty string gets past this check and is then refused by the store's
/// own validation. `content` must already be a string: numbers are not
/// coerced.
pub async fn create(store: SharedStore, req: Request) -> Response {
    let value: Value = match req.json().await {
        Ok(v) => v,
        Err(e) => return bad_request(&e.to_string()),
    };

    if !value.is_object() {
        return bad_request(&format!("post must be a JSON object, got `{value}`"));
    }

    if value.get("content").is_none() {
        return bad_request(MISSING_CONTENT);
    }

    let new_post: NewPost = match serde_json::from_value(value) {
        Ok(p) => p,
        Err(e) => return bad_request(&e.to_string()),
    };

    match store.insert_one(new_post).await {
        Ok(post) => {
            debug!(id = %post.id, "post created");
            Response::success("data", &post)
        }
        Err(e) => bad_request(&e.to_string()),
    }
}

/// `DELETE /posts`
pub async fn delete_all(store: SharedStore, _req: Request) -> Response {
    match store.delete_all().await {
        Ok(n) => debug!(deleted = n, "posts cleared"),
        Err(e) => return store_failure("delete_all", e),
    }
    match store.find_all().await {
        Ok(posts) => Response::success("posts", &posts),
        Err(e) => store_failure("find_all", e),
    }
}

/// `DELETE /posts/{id}`
pub async fn delete_one(store: SharedStore, req: Request) -> Response {
    let id = post_id(&req);
    match store.delete_by_id(&id).await {
        Ok(true) => Response::success("data", &Value::Null),
        Ok(false) => bad_request(NO_SUCH_POST),
        Err(StoreError::InvalidId(_)) => bad_request(BAD_POST_ID),
        Err(e) => store_failure("delete_by_id", e),
    }
}

/// `PATCH /posts/{id}`
///
/// A body that does not parse and an id the store cannot read share one
/// message.
pub async fn update_one(store: SharedStore, req: Request) -> Response {
    let id = post_id(&req);

    let patch = match req.json::<Value>().await {
        Ok(value) => match PostPatch::from_json(value) {
            Ok(p) => p,
            Err(e) => {
                debug!("rejected patch: {e}");
                return bad_request(BAD_PATCH);
            }
        },
        Err(e) => {
            debug!("rejected patch: {e}");
            return bad_request(BAD_PATCH);
        }
    };

    match store.update_by_id(&id, patch).await {
        Ok(true) => {}
        Ok(false) => return bad_request(NO_SUCH_POST),
        Err(StoreError::InvalidId(_)) => return bad_request(BAD_PATCH),
        Err(e) => return store_failure("update_by_id", e),
    }

    match store.find_by_id(&id).await {
        Ok(Some(post)) => Response::success("data", &post),
        // Deleted between the update and the read-back.
        Ok(None) => bad_request(NO_SUCH_POST),
        Err(e) => store_failure("find_by_id", e),
    }
}
