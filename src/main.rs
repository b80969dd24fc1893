//! RSVP Backend
//!
//! Collects afterparty and wedding RSVPs and exposes them for review.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod validation;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat, StoreBackend};
use db::{MemoryStore, RsvpStore, SqliteStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RsvpStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json_logs = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting RSVP Backend");
    tracing::info!("Record store: {}", config.store.as_str());
    if config.store == StoreBackend::Sqlite {
        tracing::info!("Database path: {:?}", config.db_path);
    }
    tracing::info!("Bind address: {}", config.bind_addr);

    let store: Arc<dyn RsvpStore> = match config.store {
        StoreBackend::Sqlite => {
            let pool = db::init_database(&config.db_path, config.db_max_connections).await?;
            Arc::new(SqliteStore::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; RSVPs are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app = create_router(AppState { store });

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        .route(
            "/rsvp",
            get(api::list_rsvps)
                .post(api::submit_rsvp)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/wedding-rsvp",
            get(api::list_wedding_rsvps)
                .post(api::submit_wedding_rsvp)
                .fallback(api::method_not_allowed),
        );

    let health_routes = Router::new().route(
        "/health",
        get(api::health_check).fallback(api::method_not_allowed),
    );

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                tracing::info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        tracing::info!("Received Ctrl+C, shutting down...");
    }
}
