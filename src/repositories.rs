use crate::{
    domain::PostRepository,
    errors::RepoError,
    models::{NewPost, Post, PostPatch},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{self, info};
use uuid::Uuid;

/// Query used to check that the table answers at all.
const REACHABILITY_QUERY: [(&str, &str); 2] = [("select", "id"), ("limit", "1")];

/// Talks to the hosted store's REST interface (`/rest/v1/<table>`).
#[derive(Debug, Clone)]
pub struct SupabasePostRepository {
    client: Client,
    base_url: String,
    api_key: String,
    table_name: String,
}

impl SupabasePostRepository {
    /// Creates a new repository instance configured for a specific table.
    pub fn new(client: Client, base_url: String, api_key: String, table_name: String) -> Self {
        info!(%table_name, %base_url, "Initializing SupabasePostRepository");
        Self {
            client,
            base_url,
            api_key,
            table_name,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), self.table_name)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Sends the request and decodes the row array the store answers with.
    async fn fetch_rows<T: DeserializeOwned>(&self, builder: RequestBuilder, action: &str) -> Result<Vec<T>, RepoError> {
        let response = builder
            .send()
            .await
            .with_context(|| format!("Supabase (table: {}): failed to {}", self.table_name, action))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Supabase (table: {}): failed to read response to {}", self.table_name, action))?;

        if !status.is_success() {
            let message = store_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Record store error").to_string());
            tracing::error!(table_name = %self.table_name, %status, %message, "Supabase: request to {} rejected", action);
            return Err(RepoError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(table_name = %self.table_name, error = %e, "Supabase: failed to parse rows");
            RepoError::DataCorruption(format!(
                "Failed to parse rows from table '{}' while trying to {}: {}",
                self.table_name, action, e
            ))
        })
    }
}

// The store reports failures as `{"message": ..., "code": ..., ...}`.
fn store_message(body: &str) -> Option<String> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        Err(_) => {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

#[async_trait]
impl PostRepository for SupabasePostRepository {
    async fn list_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(table_name = %self.table_name, "Supabase: listing posts");
        let request = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let posts = self.fetch_rows::<Post>(request, "list posts").await?;
        tracing::info!(table_name = %self.table_name, count = posts.len(), "Supabase: listed posts");
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let filter = format!("eq.{}", id);
        let request = self
            .request(Method::GET)
            .query(&[("select", "*"), ("id", filter.as_str())]);
        let posts = self.fetch_rows::<Post>(request, "get post").await?;
        Ok(posts.into_iter().next())
    }

    async fn insert(&self, post: &NewPost) -> Result<Post, RepoError> {
        let request = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(&[post]);
        self.fetch_rows::<Post>(request, "insert post")
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::DataCorruption(format!("Insert into '{}' returned no row", self.table_name)))
    }

    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, table_name = %self.table_name, "Supabase: updating post");
        let filter = format!("eq.{}", id);
        let request = self
            .request(Method::PATCH)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation")
            .json(patch);
        Ok(self.fetch_rows::<Post>(request, "update post").await?.into_iter().next())
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        tracing::debug!(post_id = %id, table_name = %self.table_name, "Supabase: deleting post");
        let filter = format!("eq.{}", id);
        let request = self
            .request(Method::DELETE)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation");
        Ok(self.fetch_rows::<Post>(request, "delete post").await?.into_iter().next())
    }

    async fn search_caption(&self, query: &str) -> Result<Vec<Post>, RepoError> {
        let pattern = format!("ilike.*{}*", query);
        let request = self.request(Method::GET).query(&[
            ("select", "*"),
            ("caption", pattern.as_str()),
            ("order", "created_at.desc"),
        ]);
        self.fetch_rows::<Post>(request, "search posts").await
    }

    async fn ping(&self) -> Result<(), RepoError> {
        let request = self.request(Method::GET).query(&REACHABILITY_QUERY);
        self.fetch_rows::<serde_json::Value>(request, "check table")
            .await
            .map(|_| ())
    }
}
