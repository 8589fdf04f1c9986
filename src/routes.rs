use crate::{
    handlers, // Import handlers module
    AppState,
};
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

/// Creates the Axum router and associates routes with handlers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/api/posts/search", get(handlers::search_posts))
        .route(
            "/api/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::route_not_found)
        // Middleware Layers
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state) // Pass the application state
}
