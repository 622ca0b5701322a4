//! DEX backend server
//!
//! Main entry point: wires the stores, the price service, and the HTTP
//! surface together and runs until a shutdown signal arrives.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dex_api_server::{create_router, AppState, StoreDirectory};
use dex_core::Settings;
use dex_price_feed::{default_sources, PriceFeedConfig, PriceService};
use dex_store::{PoolStore, TokenStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("Starting DEX backend v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::from_env();

    // Stores
    let tokens = Arc::new(TokenStore::with_defaults());
    let pools = Arc::new(PoolStore::new(Arc::clone(&tokens)));
    info!("token store seeded with {} tokens", tokens.len());

    // Price service
    let sources = default_sources(&settings)?;
    let directory = Arc::new(StoreDirectory::new(Arc::clone(&tokens)));
    let price = Arc::new(PriceService::new(
        PriceFeedConfig {
            update_interval: settings.update_interval,
        },
        sources,
        directory,
    ));
    price.start();

    // HTTP surface
    let state = AppState {
        price: Arc::clone(&price),
        tokens,
        pools,
    };
    let app = create_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    price.stop().await;
    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        }
        _ = terminate => {
            info!("Received termination signal");
        }
    }
}
