use super::api::{ClientError, PostsApi};
use crate::models::{NewPost, Post, PostPatch};
use uuid::Uuid;

/// Client-side mirror of the post collection.
///
/// Every mutation goes through the API and is followed by a full reload; the
/// cached list is never patched locally.
pub struct PostStore<A> {
    api: A,
    posts: Vec<Post>,
    last_error: Option<String>,
}

impl<A: PostsApi> PostStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            posts: Vec::new(),
            last_error: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Error from the most recent load, if it failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Replaces the cached collection with the server's. On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.api.list().await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Loaded posts");
                self.posts = posts;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading posts");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    // The mutation already happened; a failed reload is recorded in `last_error`.
    async fn reload_after_mutation(&mut self) {
        let _ = self.load().await;
    }

    pub async fn create(&mut self, post: &NewPost) -> Result<Post, ClientError> {
        let created = self.api.create(post).await?;
        self.reload_after_mutation().await;
        Ok(created)
    }

    pub async fn update(&mut self, id: Uuid, patch: &PostPatch) -> Result<Post, ClientError> {
        let updated = self.api.update(id, patch).await?;
        self.reload_after_mutation().await;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<Post, ClientError> {
        let deleted = self.api.delete(id).await?;
        self.reload_after_mutation().await;
        Ok(deleted)
    }

    /// Matches are returned to the caller; the cached collection is left alone.
    pub async fn search(&self, query: &str) -> Result<Vec<Post>, ClientError> {
        self.api.search(query).await
    }
}
