//! The post resource.

use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// A stored post as clients see it.
///
/// `id` is assigned by the store at creation and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
}

/// Input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub name: Option<String>,
    pub content: String,
}

impl NewPost {
    /// Document-level validation applied by every store on insert.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.content.is_empty() {
            return Err(StoreError::Validation("content: Path `content` is required.".into()));
        }
        Ok(())
    }
}

/// Partial update. Fields left `None` keep their stored value.
///
/// Unknown fields, `id` included, are ignored. `content` cannot be cleared:
/// a `null` content leaves it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostPatch {
    /// `Some(None)` clears the name (`"name": null`).
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Marks a field that appeared in the JSON, even as `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl PostPatch {
    /// Reads a patch from a decoded JSON body. Only objects are patches.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(serde::de::Error::custom("patch must be a JSON object"));
        }
        serde_json::from_value(value)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none()
    }

    /// Applies the patch in place.
    pub fn apply(self, post: &mut Post) {
        if let Some(name) = self.name {
            post.name = name;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_fails_validation() {
        let post = NewPost { name: Some("a".into()), content: String::new() };
        assert!(matches!(post.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn patch_ignores_id_and_unknown_fields() {
        let patch: PostPatch =
            serde_json::from_str(r#"{"id":"x","_id":"y","likes":3,"name":"n"}"#).unwrap();
        assert_eq!(patch, PostPatch { name: Some(Some("n".into())), content: None });
    }

    #[test]
    fn patch_rejects_non_objects() {
        assert!(PostPatch::from_json(serde_json::json!([])).is_err());
        assert!(PostPatch::from_json(serde_json::json!("name")).is_err());
        assert!(PostPatch::from_json(serde_json::json!({"content": 5})).is_err());
        assert!(PostPatch::from_json(serde_json::json!({})).unwrap().is_empty());
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut post = Post { id: "1".into(), name: Some("old".into()), content: "body".into() };
        PostPatch { name: Some(Some("new".into())), content: None }.apply(&mut post);
        assert_eq!(post, Post { id: "1".into(), name: Some("new".into()), content: "body".into() });
    }

    #[test]
    fn null_name_clears_it_but_null_content_is_ignored() {
        let patch = PostPatch::from_json(serde_json::json!({"name": null, "content": null})).unwrap();
        assert_eq!(patch, PostPatch { name: Some(None), content: None });
        assert!(!patch.is_empty());

        let mut post = Post { id: "1".into(), name: Some("old".into()), content: "body".into() };
        patch.apply(&mut post);
        assert_eq!(post, Post { id: "1".into(), name: None, content: "body".into() });
    }

    #[test]
    fn absent_name_is_omitted_from_json() {
        let post = Post { id: "1".into(), name: None, content: "c".into() };
        assert_eq!(serde_json::to_string(&post).unwrap(), r#"{"id":"1","content":"c"}"#);
    }
}
