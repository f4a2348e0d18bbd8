//! Startup sequence shared by the binary: configuration, broker, consume loop.

use anyhow::Result;
use tracing::{error, info};

use crate::config::{self, error::ErrorConfig, rabbit::RabbitMQConfig, service::ServiceConfig};
use crate::error::Error;
use crate::handler::MessageHandler;
use crate::oauth::{self, ServiceClient, TokenClient};
use crate::rabbitmq::RabbitMQConsumer;

/// Read the configuration through `lookup`.
///
/// `Ok(None)` when a required broker variable is absent; the reason has
/// already been logged.
pub fn configure<F>(lookup: F) -> crate::error::Result<Option<(RabbitMQConfig, ServiceConfig)>>
where
    F: Fn(&str) -> Option<String>,
{
    match config::load(lookup).map_err(Error::from) {
        Ok(configs) => Ok(Some(configs)),
        Err(e @ Error::Config(ErrorConfig::MissingVars(_))) => {
            error!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Run the listener until the delivery stream ends or a message fails.
///
/// Returns before any broker connection when the configuration is incomplete.
pub async fn run<F>(lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let Some((rabbitmq_config, service_config)) = configure(lookup)? else {
        return Ok(());
    };

    let client = oauth::http_client()?;
    let handler = MessageHandler::new(
        rabbitmq_config.queue_name.clone(),
        TokenClient::new(client.clone(), &service_config),
        ServiceClient::new(client, &service_config),
    );

    let mut consumer = RabbitMQConsumer::new(rabbitmq_config.clone());
    consumer.init().await?;
    let deliveries = consumer.start_consuming().await?;

    info!("Starting consumer session..");
    info!("rabbitmq config: {:?}", rabbitmq_config);
    info!("service config: {:?}", service_config);
    info!(connected = consumer.is_connected(), "Consumer running. Kill the process to stop.");

    RabbitMQConsumer::consume_messages(deliveries, &handler).await
}
