//! Fleet commission server.
//!
//! Loads the rate schedule from `FLEET_CONFIG_DIR` (default `./config/fleet`)
//! and serves the HTTP API on the configured bind address.

use std::env;
use std::error::Error;

use tracing::info;

use fleet_commission::api::{AppState, create_router};
use fleet_commission::config::ConfigLoader;
use fleet_commission::logging::{self, LogFormat};

const DEFAULT_CONFIG_DIR: &str = "./config/fleet";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    logging::init(LogFormat::from_env_value(
        env::var("FLEET_LOG_FORMAT").ok().as_deref(),
    ));

    let config_dir = env::var("FLEET_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    let bind_address = config.server().bind_address.clone();

    info!(
        config_dir = %config_dir,
        rate_schedule = %config.rate_table().name(),
        version = %config.rate_table().version(),
        "Loaded configuration"
    );

    let router = create_router(AppState::from_config(config));
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(bind_address = %bind_address, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
