pub mod client;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod startup;
pub mod validation;

use crate::services::PostsService;

/// AppState holds shared resources for the web server.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostsService,
}
