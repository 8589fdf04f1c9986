use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinkergram::config::Config;
use tinkergram::errors::AppError;
use tinkergram::routes::create_router;
use tinkergram::services::PostsService;
use tinkergram::startup::{build_repository, check_store};
use tinkergram::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tinkergram=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().map_err(|e| {
        tracing::error!("Missing or invalid configuration. Please check your .env file: {}", e);
        AppError::from(e)
    })?;

    let repo = build_repository(&config)?;
    check_store(repo.as_ref(), &config.posts_table).await;

    let state = Arc::new(AppState {
        posts: PostsService::new(repo),
    });
    let app = create_router(state);

    let addr = config.bind_address;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Tinkergram backend listening on http://{}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API base URL: http://{}/api", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
