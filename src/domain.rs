use crate::errors::RepoError;
use crate::models::{NewPost, Post, PostPatch};
use async_trait::async_trait;
use uuid::Uuid;

/// Operations the Posts Service needs from the record store.
#[async_trait]
pub trait PostRepository: Send + Sync + 'static { // Send+Sync+'static required for Arc<dyn>
    /// All posts, newest `created_at` first.
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError>;

    /// Returns Ok(None) if no post has this id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Inserts a post and returns it with the store-assigned `id` and `created_at`.
    async fn insert(&self, post: &NewPost) -> Result<Post, RepoError>;

    /// Applies `patch` to the matching row. Ok(None) means zero rows matched.
    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Option<Post>, RepoError>;

    /// Removes the matching row and returns its prior state. Ok(None) means zero rows matched.
    async fn delete(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Case-insensitive substring match on `caption`, newest first.
    async fn search_caption(&self, query: &str) -> Result<Vec<Post>, RepoError>;

    /// Cheap reachability check used at startup.
    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
