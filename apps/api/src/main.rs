mod applications;
mod config;
mod db;
mod errors;
mod import;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::applications::store::{ApplicationStore, InMemoryApplicationStore, PgApplicationStore};
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::import::coordinator::ImportCoordinator;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tracker API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn ApplicationStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            Arc::new(PgApplicationStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store (data is lost on restart)");
            Arc::new(InMemoryApplicationStore::new())
        }
    };

    let importer = ImportCoordinator::new(Arc::clone(&store), config.import_concurrency);
    info!(
        "Import pipeline ready (concurrency {}, max upload {} bytes)",
        config.import_concurrency, config.import_max_bytes
    );

    let state = AppState {
        store,
        importer,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
