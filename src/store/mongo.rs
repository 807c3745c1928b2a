//! MongoDB-backed post store.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{PostStore, StoreError, parse_id};
use crate::post::{NewPost, Post, PostPatch};

const COLLECTION: &str = "posts";

/// Database used when the connection string names none.
const DEFAULT_DATABASE: &str = "test";

/// A post as it is laid out in the collection.
#[derive(Debug, Serialize, Deserialize)]
struct PostDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    content: String,
}

impl From<PostDocument> for Post {
    fn from(d: PostDocument) -> Self {
        Post { id: d.id.to_hex(), name: d.name, content: d.content }
    }
}

/// Post store over the `posts` collection of one MongoDB database.
///
/// The driver's client pools connections internally; one `MongoStore` is
/// created at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct MongoStore {
    posts: Collection<PostDocument>,
}

impl MongoStore {
    /// Connects with `uri` and checks the server answers a `ping`.
    pub async fn connect(uri: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        db.run_command(doc! { "ping": 1 }, None).await?;
        info!(database = db.name(), "database connected");
        Ok(Self { posts: db.collection(COLLECTION) })
    }
}

#[async_trait]
impl PostStore for MongoStore {
    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let cursor = self.posts.find(None, None).await?;
        let docs: Vec<PostDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Post::from).collect())
    }

    async fn insert_one(&self, post: NewPost) -> Result<Post, StoreError> {
        post.validate()?;
        let document = PostDocument { id: ObjectId::new(), name: post.name, content: post.content };
        self.posts.insert_one(&document, None).await?;
        Ok(document.into())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let oid = parse_id(id)?;
        let found = self.posts.find_one(doc! { "_id": oid }, None).await?;
        Ok(found.map(Post::from))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let result = self.posts.delete_one(doc! { "_id": oid }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn update_by_id(&self, id: &str, patch: PostPatch) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let filter = doc! { "_id": oid };

        // `$set` with no fields is rejected by the server; an empty patch
        // only needs to know whether the post exists.
        if patch.is_empty() {
            return Ok(self.posts.count_documents(filter, None).await? > 0);
        }

        let mut set = Document::new();
        // `Some(None)` stores an explicit null.
        if let Some(name) = patch.name {
            set.insert("name", name);
        }
        if let Some(content) = patch.content {
            set.insert("content", content);
        }
        let result = self.posts.update_one(filter, doc! { "$set": set }, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let result = self.posts.delete_many(doc! {}, None).await?;
        Ok(result.deleted_count)
    }
}
