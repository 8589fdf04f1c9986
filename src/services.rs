use crate::{
    domain::PostRepository,
    errors::ServiceError,
    models::{CreatePostRequest, Post, UpdatePostRequest},
    validation::{validate_create, validate_query, validate_update},
};
use std::sync::Arc;
use uuid::Uuid;

/// Validated CRUD and search over posts. The only caller of [`PostRepository`].
#[derive(Clone)]
pub struct PostsService {
    repo: Arc<dyn PostRepository>,
}

impl PostsService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Post>, ServiceError> {
        let posts = self.repo.list_newest_first().await?;
        tracing::debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    /// Store failures during lookup are reported as `NotFound`.
    pub async fn get(&self, id: Uuid) -> Result<Post, ServiceError> {
        match self.repo.find_by_id(id).await {
            Ok(Some(post)) => Ok(post),
            Ok(None) => Err(ServiceError::NotFound),
            Err(e) => {
                tracing::warn!(post_id = %id, error = %e, "Lookup failed, reporting as not found");
                Err(ServiceError::NotFound)
            }
        }
    }

    pub async fn create(&self, input: &CreatePostRequest) -> Result<Post, ServiceError> {
        let new_post = validate_create(input)?;
        let post = self.repo.insert(&new_post).await?;
        tracing::info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    pub async fn update(&self, id: Uuid, input: &UpdatePostRequest) -> Result<Post, ServiceError> {
        let patch = validate_update(input)?;
        let post = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or(ServiceError::NotFound)?;
        tracing::info!(post_id = %id, "Post updated");
        Ok(post)
    }

    /// Returns the deleted post's prior state.
    pub async fn delete(&self, id: Uuid) -> Result<Post, ServiceError> {
        let post = self.repo.delete(id).await?.ok_or(ServiceError::NotFound)?;
        tracing::info!(post_id = %id, "Post deleted");
        Ok(post)
    }

    pub async fn search(&self, query: Option<&str>) -> Result<Vec<Post>, ServiceError> {
        let query = validate_query(query)?;
        let posts = self.repo.search_caption(query).await?;
        tracing::debug!(%query, count = posts.len(), "Searched posts");
        Ok(posts)
    }
}
