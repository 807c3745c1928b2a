//! In-process post store.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{PostStore, StoreError, parse_id};
use crate::post::{NewPost, Post, PostPatch};

/// Insertion-ordered posts behind a lock. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<(ObjectId, Post)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.posts.read().await.iter().map(|(_, p)| p.clone()).collect())
    }

    async fn insert_one(&self, post: NewPost) -> Result<Post, StoreError> {
        post.validate()?;
        let oid = ObjectId::new();
        let created = Post { id: oid.to_hex(), name: post.name, content: post.content };
        self.posts.write().await.push((oid, created.clone()));
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let oid = parse_id(id)?;
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|(k, _)| *k == oid).map(|(_, p)| p.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let mut posts = self.posts.write().await;
        let before = posts.len();
        posts.retain(|(k, _)| *k != oid);
        Ok(posts.len() != before)
    }

    async fn update_by_id(&self, id: &str, patch: PostPatch) -> Result<bool, StoreError> {
        let oid = parse_id(id)?;
        let mut posts = self.posts.write().await;
        match posts.iter_mut().find(|(k, _)| *k == oid) {
            Some((_, post)) => {
                patch.apply(post);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut posts = self.posts.write().await;
        let n = posts.len() as u64;
        posts.clear();
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(name: Option<&str>, content: &str) -> NewPost {
        NewPost { name: name.map(Into::into), content: content.into() }
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids_and_keeps_order() {
        let store = MemoryStore::new();
        let a = store.insert_one(new_post(Some("a"), "one")).await.unwrap();
        let b = store.insert_one(new_post(None, "two")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn insert_rejects_empty_content() {
        let store = MemoryStore::new();
        let err = store.insert_one(new_post(None, "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(store.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_and_malformed_ids_differ() {
        let store = MemoryStore::new();
        let absent = ObjectId::new().to_hex();
        assert!(!store.delete_by_id(&absent).await.unwrap());
        assert!(matches!(store.delete_by_id("nope").await, Err(StoreError::InvalidId(_))));
        assert!(!store.update_by_id(&absent, PostPatch::default()).await.unwrap());
        assert!(store.find_by_id(&absent).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_merges_and_keeps_id() {
        let store = MemoryStore::new();
        let post = store.insert_one(new_post(Some("old"), "body")).await.unwrap();
        let patch = PostPatch { name: Some(Some("new".into())), content: None };
        assert!(store.update_by_id(&post.id, patch).await.unwrap());

        let updated = store.find_by_id(&post.id).await.unwrap().unwrap();
        assert_eq!(updated.id, post.id);
        assert_eq!(updated.name.as_deref(), Some("new"));
        assert_eq!(updated.content, "body");
    }

    #[tokio::test]
    async fn delete_all_reports_count() {
        let store = MemoryStore::new();
        store.insert_one(new_post(None, "x")).await.unwrap();
        store.insert_one(new_post(None, "y")).await.unwrap();
        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }
}
