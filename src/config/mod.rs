pub mod error;
pub mod rabbit;
pub mod service;

use dotenv::dotenv;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{error::Result, rabbit::RabbitMQConfig, service::ServiceConfig};

/// Load `.env` and install the log subscriber
pub fn init() -> Result<()> {
    dotenv().ok();
    init_tracing()?;

    info!("Starting choreo-listener");
    Ok(())
}

/// Read both configuration sets through `lookup`.
///
/// The broker settings are checked for presence; the service settings are not.
pub fn load<F>(lookup: F) -> Result<(RabbitMQConfig, ServiceConfig)>
where
    F: Fn(&str) -> Option<String>,
{
    let service_config = ServiceConfig::from_lookup(&lookup);
    let rabbitmq_config = RabbitMQConfig::from_lookup(&lookup)?;

    Ok((rabbitmq_config, service_config))
}

/// Process environment lookup for [`load`]
pub fn env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// `RUST_LOG` wins when set, otherwise `info`
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()?;

    Ok(())
}
