//! Waste Collection Monitor API Server

mod config;
mod db;
mod error;
mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use config::AppConfig;
use db::PgStore;
use error::ApiError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wm_core::{RecordStore, SiteCatalog};

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub catalog: Arc<SiteCatalog>,
    pub config: AppConfig,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(routes::health_check))

        // Collections
        .route(
            "/api/collections",
            post(routes::collections::submit).get(routes::collections::list),
        )

        // Aggregates
        .route("/api/dashboard", get(routes::dashboard::dashboard))
        .route("/api/summary", get(routes::dashboard::summary))
        .route("/api/sites", get(routes::sites::list_sites))

        // CORS
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))

        // Tracing
        .layer(TraceLayer::new_for_http())

        // State
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "wm_api=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Waste Collection Monitor API Server");

    let config = AppConfig::from_env()?;
    let catalog = Arc::new(SiteCatalog::load(config.site_catalog.as_deref())?);
    info!("Loaded {} sites", catalog.len());

    // Connect to database
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations").run(&db).await?;

    info!("Database migrations complete");

    let state = Arc::new(AppState {
        store: Arc::new(PgStore::new(db, catalog.clone())),
        catalog,
        config,
    });

    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    info!("Listening on {}", state.config.bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
