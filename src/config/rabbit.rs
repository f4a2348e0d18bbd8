use crate::config::error::{ErrorConfig, Result};
use lapin::uri::{AMQPAuthority, AMQPQueryString, AMQPScheme, AMQPUri, AMQPUserInfo};
use std::fmt;
use tracing::{debug, info};

pub const AMQP_PORT: u16 = 5672;
pub const EXCHANGE_NAME: &str = "choreo";
pub const QUEUE_NAME: &str = "TestQueue5";

pub const USERNAME: &str = "USERNAME";
pub const VHOST: &str = "VHOST";
pub const HOST: &str = "HOST";
pub const PASSWORD: &str = "PASSWORD";

#[derive(Clone)]
pub struct RabbitMQConfig {
    pub username: String,
    pub password: String,
    pub host: String,
    pub vhost: String,
    pub port: u16,
    pub exchange_name: String,
    pub queue_name: String,
}

impl RabbitMQConfig {
    /// Load the broker settings through `lookup`.
    ///
    /// All four variables must be present (an empty value still counts as set).
    /// Exchange, queue and port are fixed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading RabbitMQ configuration from environment");

        let mut missing = Vec::new();
        let mut get = |key: &'static str| {
            debug!("Getting {} from env", key);
            let value = lookup(key);
            if value.is_none() {
                missing.push(key);
            }
            value.unwrap_or_default()
        };

        let username = get(USERNAME);
        let vhost = get(VHOST);
        let host = get(HOST);
        let password = get(PASSWORD);

        if !missing.is_empty() {
            return Err(ErrorConfig::MissingVars(missing));
        }

        Ok(Self {
            username,
            password,
            host,
            vhost,
            port: AMQP_PORT,
            exchange_name: EXCHANGE_NAME.to_string(),
            queue_name: QUEUE_NAME.to_string(),
        })
    }

    /// Connection target built field by field, so the vhost is never parsed out of a URL
    pub fn amqp_uri(&self) -> AMQPUri {
        AMQPUri {
            scheme: AMQPScheme::AMQP,
            authority: AMQPAuthority {
                userinfo: AMQPUserInfo {
                    username: self.username.clone(),
                    password: self.password.clone(),
                },
                host: self.host.clone(),
                port: self.port,
            },
            vhost: self.vhost.clone(),
            query: AMQPQueryString::default(),
        }
    }
}

impl fmt::Debug for RabbitMQConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RabbitMQConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("vhost", &self.vhost)
            .field("port", &self.port)
            .field("exchange_name", &self.exchange_name)
            .field("queue_name", &self.queue_name)
            .finish()
    }
}
