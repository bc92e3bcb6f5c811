//! storefront-api: order management REST service
//!
//! ## Configuration
//! - `config.yaml` in the working directory, a path given as the first
//!   argument (or `--config <path>`), or the file named by STOREFRONT_CONFIG
//! - STOREFRONT__SERVER__PORT, STOREFRONT__STORAGE__PATH, ... override any key
//! - STOREFRONT_LOG: tracing filter (default: info)

use tracing::{error, info};

use storefront::api::{self, AppState};
use storefront::config::Config;
use storefront::storage::init_storage;
use storefront::utils::bootstrap::{init_tracing, parse_config_path};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config_path = parse_config_path();
    let config = Config::load(config_path.as_deref()).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind = %config.server.bind_address(),
        storage = %config.storage.path,
        "starting storefront-api"
    );

    let pool = init_storage(&config.storage).await.map_err(|e| {
        error!(error = %e, "failed to open storage");
        e
    })?;

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    api::serve(listener, AppState::new(pool.clone())).await?;

    pool.close().await;
    info!("storefront-api stopped");
    Ok(())
}
