mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;

use std::sync::Arc;

use handlers::rest;
use repository::Repository;
use service::NoteService;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt::init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded notes API config");

    // Repository creation and migration
    let repo = Repository::connect(&cfg.database)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to establish database connection: {e}");
            panic!("failed to establish database connection: {e}");
        });

    repo.migrate().await.unwrap_or_else(|e| {
        tracing::error!("Failed to migrate database: {e}");
        panic!("failed to migrate database: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(repo));

    let router = rest::router(service);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.bind_addr());
            panic!("failed to bind to {}: {e}", cfg.bind_addr());
        });

    match listener.local_addr() {
        Ok(addr) => tracing::info!("Notes API listening on {}", addr),
        Err(e) => tracing::warn!("Could not read listener address: {e}"),
    }

    if let Err(e) = axum::serve(listener, router).await {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }
}
