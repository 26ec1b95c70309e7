pub mod api;
pub mod config;
pub mod model;
pub mod service;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export all model types
pub use model::*;

pub use service::{InstrumentMapper, InstrumentService};

// Export store types
pub use store::{InMemoryInstrumentStore, InstrumentStore, PostgresInstrumentStore};

use config::{AppConfig, StoreBackend};
use std::sync::Arc;

/// Serve the API for `store` on the configured address until the process exits.
pub async fn serve_store<S: InstrumentStore + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let app = api::routes::build_app(store, config);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Instrument server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}

/// Load configuration, connect the configured store backend and serve.
pub async fn run_server() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{} backend={:?}",
        config.server.host,
        config.server.port,
        config.database.backend
    );

    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let store = PostgresInstrumentStore::new(&database_url, config.max_connections()).await?;

            log::info!("Ensuring instrument table exists...");
            store.migrate().await?;

            serve_store(Arc::new(store), &config).await
        }
        StoreBackend::Memory => {
            log::warn!("Using in-memory store, data is lost on shutdown");
            serve_store(Arc::new(InMemoryInstrumentStore::new()), &config).await
        }
    }
}
