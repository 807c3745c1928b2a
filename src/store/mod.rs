//! Persistence gateway for posts.
//!
//! Handlers only ever see [`PostStore`]. Two implementations ship with the
//! crate: [`MongoStore`] for real deployments and [`MemoryStore`] for tests
//! and database-less runs. Both use MongoDB ObjectIds, so an id that is
//! malformed for one is malformed for the other.

use std::sync::Arc;

use async_trait::async_trait;

use tracing::info;

use crate::config::StoreConfig;
use crate::post::{NewPost, Post, PostPatch};

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Store handle shared by every request for the life of the process.
pub type SharedStore = Arc<dyn PostStore>;

/// Errors raised by a [`PostStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The id cannot be interpreted as an ObjectId.
    #[error("invalid post id `{0}`")]
    InvalidId(String),
    /// The document failed validation on insert.
    #[error("Post validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] mongodb::error::Error),
}

/// Collection-level operations over the `posts` collection.
///
/// Each call is one atomic store operation; there is no cross-call
/// transaction. Missing documents are `Ok(None)` / `Ok(false)`, never errors.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every post, in whatever order the store returns them.
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;

    /// Validates and inserts `post`, returning it with its new id.
    async fn insert_one(&self, post: NewPost) -> Result<Post, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Returns whether a document was deleted.
    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError>;

    /// Merges `patch` into the post. Returns whether a document matched.
    async fn update_by_id(&self, id: &str, patch: PostPatch) -> Result<bool, StoreError>;

    /// Removes every post, returning how many were deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}

/// Opens the store named by `config`.
pub async fn open(config: &StoreConfig) -> Result<SharedStore, StoreError> {
    match config {
        StoreConfig::Mongo { uri } => Ok(Arc::new(MongoStore::connect(uri).await?)),
        StoreConfig::Memory => {
            info!("using in-memory store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Parses a client-supplied id into an ObjectId.
pub(crate) fn parse_id(id: &str) -> Result<mongodb::bson::oid::ObjectId, StoreError> {
    mongodb::bson::oid::ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_owned()))
}
