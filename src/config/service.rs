use std::fmt;
use tracing::debug;

use crate::error::{Error, Result};

pub const SVC_URL: &str = "SVC_URL";
pub const CONSUMER_KEY: &str = "CONSUMER_KEY";
pub const CONSUMER_SECRET: &str = "CONSUMER_SECRET";
pub const TOKEN_URL: &str = "TOKEN_URL";

/// Downstream service and OAuth client settings.
///
/// None of these are checked at startup. A missing value only surfaces
/// when a message is handled.
#[derive(Clone, Default)]
pub struct ServiceConfig {
    pub service_url: Option<String>,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub token_url: Option<String>,
}

impl ServiceConfig {
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            debug!("Getting {} from env", key);
            lookup(key)
        };

        Self {
            service_url: get(SVC_URL),
            consumer_key: get(CONSUMER_KEY),
            consumer_secret: get(CONSUMER_SECRET),
            token_url: get(TOKEN_URL),
        }
    }
}

/// Resolve a setting that was left unchecked at startup
pub(crate) fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value.as_deref().ok_or(Error::MissingSetting(name))
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("service_url", &self.service_url)
            .field("consumer_key", &self.consumer_key)
            .field(
                "consumer_secret",
                &self.consumer_secret.as_ref().map(|_| "***"),
            )
            .field("token_url", &self.token_url)
            .finish()
    }
}
