use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::config::service::{SVC_URL, ServiceConfig, required};
use crate::error::Result;
use crate::oauth::AccessToken;

#[async_trait]
pub trait ServiceCaller: Send + Sync {
    async fn call(&self, token: &AccessToken) -> Result<ServiceResponse>;
}

/// Raw downstream reply. The status is reported, never checked.
#[derive(Debug, Clone)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub body: String,
}

pub struct ServiceClient {
    client: Client,
    service_url: Option<String>,
}

impl ServiceClient {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            service_url: config.service_url.clone(),
        }
    }
}

#[async_trait]
impl ServiceCaller for ServiceClient {
    async fn call(&self, token: &AccessToken) -> Result<ServiceResponse> {
        let url = required(&self.service_url, SVC_URL)?;
        debug!("📤 GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        Ok(ServiceResponse { status, body })
    }
}
