//! OC Rates Server Binary

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oc_rates_fx::{ExpiringCache, FixerClient, RatesService};
use oc_rates_server::{router, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let config = ServerConfig::from_env();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    info!("Starting OC Rates server");

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    let instance_id = config
        .instance_id
        .clone()
        .unwrap_or_else(|| format!("oc-rates-{}", uuid::Uuid::new_v4()));

    let ttl = chrono::Duration::from_std(config.cache_ttl)?;
    let provider =
        FixerClient::with_base_url(config.fixer_api_key.clone(), config.fixer_base_url.clone());
    let service = Arc::new(RatesService::new(provider, ExpiringCache::new(ttl)));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    info!(
        instance_id = %instance_id,
        listen_addr = %listener.local_addr()?,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Server running"
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(instance_id = %instance_id, "Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
