use catalog_server::Server;
use catalog_store::MemoryStore;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let addr = std::env::var("CATALOG_STORE_ADDR").unwrap_or_else(|_| "0.0.0.0:9700".to_string());

    let server = Server::new(MemoryStore::new(), &addr);
    if let Err(e) = server.serve() {
        tracing::error!(%addr, error = %e, "catalog-server failed");
        std::process::exit(1);
    }
}
