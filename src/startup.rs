use crate::config::{mask_key, Config, StoreBackend};
use crate::domain::PostRepository;
use crate::errors::AppError;
use crate::memory::InMemoryPostRepository;
use crate::repositories::SupabasePostRepository;
use reqwest::Client;
use std::sync::Arc;
use tracing;

/// Builds the record store client the configuration asks for.
pub fn build_repository(config: &Config) -> Result<Arc<dyn PostRepository>, AppError> {
    match &config.store {
        StoreBackend::Supabase { url, api_key } => {
            tracing::info!(supabase_url = %url, supabase_key = %mask_key(api_key), "Startup: using hosted record store");
            let client = Client::builder()
                .user_agent(concat!("tinkergram/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| AppError::InitError(format!("Failed to build HTTP client: {}", e)))?;
            Ok(Arc::new(SupabasePostRepository::new(
                client,
                url.clone(),
                api_key.clone(),
                config.posts_table.clone(),
            )))
        }
        StoreBackend::Memory => {
            tracing::warn!("Startup: using in-memory record store, posts will not survive a restart");
            Ok(Arc::new(InMemoryPostRepository::new()))
        }
    }
}

/// Pings the record store once. A failed check is logged, not fatal.
pub async fn check_store(repo: &dyn PostRepository, table: &str) {
    tracing::info!("Startup: checking record store for table '{}'...", table);
    match repo.ping().await {
        Ok(()) => tracing::info!("Startup: table '{}' is reachable.", table),
        Err(e) => tracing::warn!(error = %e, "Startup: table '{}' could not be reached, continuing anyway", table),
    }
}
