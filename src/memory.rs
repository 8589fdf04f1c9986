use crate::{
    domain::PostRepository,
    errors::RepoError,
    models::{NewPost, Post, PostPatch},
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Non-durable store for local runs and tests.
///
/// Rows are kept in insertion order and `created_at` never goes backwards, so
/// reversing the vector gives newest-first ordering with ties broken by insertion.
#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    rows: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        Ok(self.rows.read().await.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, RepoError> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();
        let created_at = rows.last().map_or(now, |last| last.created_at.max(now));
        let post = Post {
            id: Uuid::new_v4(),
            image: post.image.clone(),
            caption: post.caption.clone(),
            created_at,
        };
        rows.push(post.clone());
        tracing::debug!(post_id = %post.id, "Memory store: inserted post");
        Ok(post)
    }

    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Option<Post>, RepoError> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|p| p.id == id).map(|post| {
            patch.apply_to(post);
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter()
            .position(|p| p.id == id)
            .map(|index| rows.remove(index)))
    }

    async fn search_caption(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        let needle = query.to_lowercase();
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .rev()
            .filter(|p| p.caption.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
