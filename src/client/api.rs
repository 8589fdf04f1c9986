use crate::models::{
    ErrorResponse, HealthResponse, NewPost, Post, PostListResponse, PostPatch, PostResponse,
};
use crate::validation::ValidationError;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with an error envelope; `message` is its `error` text.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

/// The posts HTTP API as seen from a client.
#[async_trait]
pub trait PostsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, ClientError>;
    async fn get(&self, id: Uuid) -> Result<Post, ClientError>;
    async fn create(&self, post: &NewPost) -> Result<Post, ClientError>;
    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Post, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<Post, ClientError>;
    async fn search(&self, query: &str) -> Result<Vec<Post>, ClientError>;
    async fn health(&self) -> Result<HealthResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpPostsApi {
    client: Client,
    origin: String,
}

impl Default for HttpPostsApi {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

impl HttpPostsApi {
    /// `origin` is the server root, e.g. `http://localhost:3000`; the API lives under `/api`.
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_client(Client::new(), origin)
    }

    pub fn with_client(client: Client, origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self { client, origin }
    }

    fn posts_url(&self) -> String {
        format!("{}/api/posts", self.origin)
    }

    fn post_url(&self, id: Uuid) -> String {
        format!("{}/api/posts/{}", self.origin, id)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(envelope) => envelope.error,
            Err(_) if !body.trim().is_empty() => body.trim().to_string(),
            Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };
        tracing::debug!(%status, %message, "Posts API returned an error");
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl PostsApi for HttpPostsApi {
    async fn list(&self) -> Result<Vec<Post>, ClientError> {
        let response = self.client.get(self.posts_url()).send().await?;
        Ok(decode::<PostListResponse>(response).await?.data)
    }

    async fn get(&self, id: Uuid) -> Result<Post, ClientError> {
        let response = self.client.get(self.post_url(id)).send().await?;
        Ok(decode::<PostResponse>(response).await?.data)
    }

    async fn create(&self, post: &NewPost) -> Result<Post, ClientError> {
        let response = self.client.post(self.posts_url()).json(post).send().await?;
        Ok(decode::<PostResponse>(response).await?.data)
    }

    async fn update(&self, id: Uuid, patch: &PostPatch) -> Result<Post, ClientError> {
        let response = self.client.put(self.post_url(id)).json(patch).send().await?;
        Ok(decode::<PostResponse>(response).await?.data)
    }

    async fn delete(&self, id: Uuid) -> Result<Post, ClientError> {
        let response = self.client.delete(self.post_url(id)).send().await?;
        Ok(decode::<PostResponse>(response).await?.data)
    }

    async fn search(&self, query: &str) -> Result<Vec<Post>, ClientError> {
        let url = format!("{}/search", self.posts_url());
        let response = self.client.get(url).query(&[("q", query)]).send().await?;
        Ok(decode::<PostListResponse>(response).await?.data)
    }

    async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.client.get(format!("{}/health", self.origin)).send().await?;
        decode(response).await
    }
}
