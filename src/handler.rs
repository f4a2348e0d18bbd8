//! Per-message work: print the body, fetch a token, call the service.

use tracing::info;

use crate::error::Result;
use crate::oauth::{ServiceCaller, ServiceResponse, TokenSource};

pub struct MessageHandler<T, S> {
    queue_name: String,
    tokens: T,
    service: S,
}

impl<T, S> MessageHandler<T, S>
where
    T: TokenSource,
    S: ServiceCaller,
{
    pub fn new(queue_name: impl Into<String>, tokens: T, service: S) -> Self {
        Self {
            queue_name: queue_name.into(),
            tokens,
            service,
        }
    }

    /// Handle one delivery.
    ///
    /// One token fetch, then one GET only if the token arrived. Errors are
    /// returned as-is and nothing is retried.
    pub async fn handle(&self, payload: &[u8]) -> Result<ServiceResponse> {
        info!(
            "📨 Message is received from Queue {}. Message is: {}",
            self.queue_name,
            String::from_utf8_lossy(payload)
        );

        let token = self.tokens.fetch_token().await?;
        let response = self.service.call(&token).await?;

        info!(
            status = %response.status,
            "Response from the service: {}", response.body
        );

        Ok(response)
    }
}
