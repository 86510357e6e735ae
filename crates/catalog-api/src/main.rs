use std::sync::Arc;

use catalog_api::config::{Config, StoreConfig};
use catalog_client::ClientPool;
use catalog_store::{MemoryStore, Store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "bad configuration");
        std::process::exit(1);
    });

    let store: Arc<dyn Store> = match &config.store {
        StoreConfig::Embedded => {
            tracing::info!("using embedded in-memory store");
            Arc::new(MemoryStore::new())
        }
        StoreConfig::Remote { host, port } => {
            let pool = ClientPool::new((host.as_str(), *port), config.pool_size).unwrap_or_else(|e| {
                tracing::error!(%host, port, error = %e, "failed to connect to catalog-server");
                std::process::exit(1);
            });
            tracing::info!(%host, port, pool_size = config.pool_size, "connected to catalog-server");
            Arc::new(pool)
        }
    };

    let app = catalog_api::app(store, config.collection());

    let listener = tokio::net::TcpListener::bind(&config.api_addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(addr = %config.api_addr, error = %e, "failed to bind");
            std::process::exit(1);
        });

    tracing::info!(addr = %config.api_addr, collection = %config.collection(), "catalog-api listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
