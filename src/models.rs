use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted post, exactly as the record store returns it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    pub image: String,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/posts`. Both fields are optional on the wire so that a
/// missing field reaches the validator instead of failing deserialization.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Body of `PUT /api/posts/{id}`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// Validated data for a new post. The store assigns `id` and `created_at`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub image: String,
    pub caption: String,
}

/// Validated partial update; only the supplied fields are serialized.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl PostPatch {
    /// Applies the patch in place, leaving `id` and `created_at` untouched.
    pub fn apply_to(&self, post: &mut Post) {
        if let Some(image) = &self.image {
            post.image = image.clone();
        }
        if let Some(caption) = &self.caption {
            post.caption = caption.clone();
        }
    }
}

/// Success envelope for `list` and `search`. Search also echoes the query.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostListResponse {
    pub success: bool,
    pub data: Vec<Post>,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Success envelope for single-post operations.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PostResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Post,
}

/// Body of every error response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_serializes_only_supplied_fields() {
        let patch = PostPatch {
            image: None,
            caption: Some("new".into()),
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "caption": "new" }));
    }

    #[test]
    fn missing_fields_deserialize_as_none() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"caption":"hi"}"#).unwrap();
        assert!(req.image.is_none());
        assert_eq!(req.caption.as_deref(), Some("hi"));
    }
}
