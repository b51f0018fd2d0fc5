use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use sponsor_market_server::config::{Config, StoreBackend};
use sponsor_market_server::routes::create_routes;
use sponsor_market_server::store::{MemoryStore, PgStore, Store};
use sponsor_market_server::{notifier_from_config, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.store_backend {
        StoreBackend::Postgres => Arc::new(PgStore::connect(&config).await?),
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data will not survive a restart");
            Arc::new(MemoryStore::new())
        }
    };
    let notifier = notifier_from_config(&config)?;

    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN is not set, admin routes will reject every request");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = create_routes(AppState::new(config, store, notifier));

    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
