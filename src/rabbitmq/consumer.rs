use anyhow::{Context, Result};
use futures::StreamExt;
use lapin::{
    Channel, Connection, ConnectionProperties, Consumer, ExchangeKind,
    options::{BasicConsumeOptions, ExchangeDeclareOptions, QueueDeclareOptions},
    types::FieldTable,
};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::rabbit::RabbitMQConfig;
use crate::handler::MessageHandler;
use crate::oauth::{ServiceCaller, TokenSource};

pub const CONSUMER_TAG: &str = "choreo-listener";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct RabbitMQConsumer {
    config: RabbitMQConfig,
    connection: Option<Connection>,
    channel: Option<Channel>,
}

/// Exchange flags: durable topic exchange
pub fn exchange_options() -> ExchangeDeclareOptions {
    ExchangeDeclareOptions {
        durable: true,
        ..Default::default()
    }
}

/// Queue flags: broker defaults (not durable, not exclusive, no auto-delete)
pub fn queue_options() -> QueueDeclareOptions {
    QueueDeclareOptions::default()
}

/// Deliveries are acknowledged on receipt, before the handler runs
pub fn consume_options() -> BasicConsumeOptions {
    BasicConsumeOptions {
        no_ack: true,
        ..Default::default()
    }
}

impl RabbitMQConsumer {
    pub fn new(config: RabbitMQConfig) -> Self {
        Self {
            config,
            connection: None,
            channel: None,
        }
    }

    /// Connect, then declare the exchange and the queue.
    ///
    /// The queue is not bound to the exchange: only messages published
    /// straight to the queue name reach it.
    pub async fn init(&mut self) -> Result<()> {
        info!("🐰 Initializing RabbitMQ consumer...");

        let connection = tokio::time::timeout(
            CONNECT_TIMEOUT,
            Connection::connect_uri(self.config.amqp_uri(), ConnectionProperties::default()),
        )
        .await
        .context("Timed out connecting to RabbitMQ")?
        .context("Failed to connect to RabbitMQ")?;

        info!(
            "✅ Connected to RabbitMQ: {}:{} vhost {}",
            self.config.host, self.config.port, self.config.vhost
        );

        let channel = connection
            .create_channel()
            .await
            .context("Failed to create channel")?;

        info!("✅ Created RabbitMQ channel");

        channel
            .exchange_declare(
                &self.config.exchange_name,
                ExchangeKind::Topic,
                exchange_options(),
                FieldTable::default(),
            )
            .await
            .context("Failed to declare exchange")?;

        debug!("✅ Declared exchange: {}", self.config.exchange_name);

        channel
            .queue_declare(&self.config.queue_name, queue_options(), FieldTable::default())
            .await
            .context("Failed to declare queue")?;

        debug!("✅ Declared queue: {}", self.config.queue_name);

        self.connection = Some(connection);
        self.channel = Some(channel);

        info!("🚀 RabbitMQ consumer initialized successfully");
        Ok(())
    }

    /// Register the auto-ack consumer on the queue
    pub async fn start_consuming(&self) -> Result<Consumer> {
        let channel = self
            .channel
            .as_ref()
            .context("RabbitMQ consumer not initialized")?;

        let consumer = channel
            .basic_consume(
                &self.config.queue_name,
                CONSUMER_TAG,
                consume_options(),
                FieldTable::default(),
            )
            .await
            .context("Failed to create consumer")?;

        info!(
            "🔍 Started consuming from queue: {}",
            self.config.queue_name
        );

        Ok(consumer)
    }

    /// Consume on the calling task until the stream ends or a message fails.
    ///
    /// The next delivery is only pulled once the handler has returned.
    pub async fn consume_messages<T, S>(
        mut consumer: Consumer,
        handler: &MessageHandler<T, S>,
    ) -> Result<()>
    where
        T: TokenSource,
        S: ServiceCaller,
    {
        info!("📥 Starting message consumption loop...");

        while let Some(delivery) = consumer.next().await {
            let delivery = delivery.context("Error receiving message")?;
            handler
                .handle(&delivery.data)
                .await
                .context("Failed to handle message")?;
        }

        warn!("📥 Message consumption loop ended");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|connection| connection.status().connected())
    }
}
