//! Cafe API Server
//!
//! A small REST service over a SQLite table of laptop-friendly cafes:
//! list, random pick, search by location, add, update price and
//! report closed.

mod config;
mod error;
mod extractors;
mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, get_service, patch, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Config;
use services::ApiKeyVerifier;
use storage::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub api_keys: Arc<ApiKeyVerifier>,
}

#[tokio::main]
async fn main() {
    // Set up panic hook to log crashes
    std::panic::set_hook(Box::new(|info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()));
        let payload = if let Some(s) = info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        eprintln!("[PANIC] at {:?}: {}", location, payload);
        tracing::error!("PANIC at {:?}: {}", location, payload);
    }));

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting Cafe API Server v{}", env!("CARGO_PKG_VERSION"));
    info!("PID: {}", std::process::id());

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    info!(
        "Config loaded: bind={}, db={}, static={}",
        config.bind_address,
        config.database_path,
        config.static_dir.display()
    );

    let db = Arc::new(
        Database::new(&config.database_path, config.max_connections)
            .await
            .context("Failed to initialize database")?,
    );

    let api_keys = Arc::new(ApiKeyVerifier::new(config.api_key.clone()));
    if !api_keys.is_configured() {
        warn!("CAFE_API_KEY not set, DELETE /report-closed will always be refused");
    }

    let state = AppState { db, api_keys };
    let app = build_router(state, &config.static_dir);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server listening on {}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route(
            "/",
            get_service(ServeFile::new(static_dir.join("index.html"))),
        )
        .route("/health", get(handlers::health))
        .merge(api_routes())
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/random", get(handlers::cafes::random))
        .route("/all", get(handlers::cafes::all))
        .route("/search", get(handlers::cafes::search))
        .route("/add", post(handlers::cafes::add))
        .route("/update-price/:id", patch(handlers::cafes::update_price))
        .route("/report-closed/:id", delete(handlers::cafes::report_closed))
}
