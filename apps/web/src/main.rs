mod charts;
mod config;
mod errors;
mod forms;
mod models;
mod prediction;
mod records;
mod routes;
mod state;
mod store;
mod views;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::prediction::CareerPredictor;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, PostgrestStore, TableStore};
use crate::views::Views;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting career predictor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize record store
    info!("Connecting to {} record store", config.store.name());
    let store = build_store(&config.store).await?;
    info!("Record store initialized (backend: {})", store.backend());

    // Load model artifacts once; they are never reloaded
    let predictor = CareerPredictor::load(&config.scaler_path, &config.model_path)
        .context("Failed to load model artifacts")?;
    info!(
        "Career model loaded from {} + {}: {}",
        config.scaler_path.display(),
        config.model_path.display(),
        predictor.describe()
    );

    let views = Views::new().context("Failed to compile templates")?;

    // Build app state
    let state = AppState {
        store,
        predictor: Arc::new(predictor),
        views: Arc::new(views),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the record store selected by `STORE_BACKEND`.
async fn build_store(backend: &StoreBackend) -> Result<Arc<dyn TableStore>> {
    Ok(match backend {
        StoreBackend::Postgrest { url, api_key } => {
            Arc::new(PostgrestStore::new(url, api_key.clone())?)
        }
        StoreBackend::Postgres { database_url } => Arc::new(PgStore::connect(database_url).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    })
}
