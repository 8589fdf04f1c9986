use crate::{
    errors::{AppError, ServiceError},
    models::{
        CreatePostRequest, ErrorResponse, HealthResponse, Post, PostListResponse, PostResponse,
        UpdatePostRequest,
    },
    validation::validate_update,
    AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use std::{any::Any, sync::Arc};
use tracing;
use uuid::Uuid;

#[derive(Deserialize, Debug)]
pub struct SearchParams {
    pub q: Option<String>,
}

// An id that is not a UUID cannot match any stored post.
fn parse_post_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| {
        tracing::warn!(invalid_id = %id_str, "Received request with non-UUID post id");
        AppError::Service(ServiceError::NotFound)
    })
}

fn single(data: Post, message: Option<&str>) -> Json<PostResponse> {
    Json(PostResponse {
        success: true,
        message: message.map(str::to_string),
        data,
    })
}

/// Handler for GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Tinkergram backend server is running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PostListResponse>, AppError> {
    let posts = state.posts.list().await?;
    tracing::info!("Handler successfully retrieved {} posts", posts.len());
    Ok(Json(PostListResponse {
        success: true,
        count: posts.len(),
        data: posts,
        query: None,
    }))
}

pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = parse_post_id(&id_str)?;
    tracing::debug!(%post_id, "Fetching post via handler");
    let post = state.posts.get(post_id).await?;
    Ok(single(post, None))
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let post = state.posts.create(&input).await?;
    Ok((StatusCode::CREATED, single(post, Some("Post created successfully"))))
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    body: Result<Json<UpdatePostRequest>, JsonRejection>,
) -> Result<Json<PostResponse>, AppError> {
    let Json(input) = body.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    // Body errors win over an id that can never match.
    let post_id = match parse_post_id(&id_str) {
        Ok(id) => id,
        Err(not_found) => {
            validate_update(&input).map_err(ServiceError::from)?;
            return Err(not_found);
        }
    };
    let post = state.posts.update(post_id, &input).await?;
    Ok(single(post, Some("Post updated successfully")))
}

/// Deletes the post and echoes its prior state.
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let post_id = parse_post_id(&id_str)?;
    tracing::debug!(%post_id, "Deleting post via handler");
    let post = state.posts.delete(post_id).await?;
    Ok(single(post, Some("Post deleted successfully")))
}

pub async fn search_posts(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<PostListResponse>, AppError> {
    let Query(params) = params.map_err(|e| AppError::InvalidRequest(e.body_text()))?;
    let posts = state.posts.search(params.q.as_deref()).await?;
    Ok(Json(PostListResponse {
        success: true,
        count: posts.len(),
        data: posts,
        query: params.q,
    }))
}

/// Fallback for unknown paths and for known paths with an unsupported method.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    tracing::warn!(%method, %uri, "No route matched");
    let body = ErrorResponse {
        error: "Route not found".to_string(),
        message: Some(format!("Cannot {} {}", method, uri)),
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// Turns a handler panic into the generic 500 envelope.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };
    AppError::InternalServerError(detail).into_response()
}
