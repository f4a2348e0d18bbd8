//! OAuth2 client-credentials token fetch.

use async_trait::async_trait;
use reqwest::{Client, header::ACCEPT};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

use crate::config::service::{CONSUMER_KEY, CONSUMER_SECRET, ServiceConfig, TOKEN_URL, required};
use crate::error::{Error, Result};

/// Something that can hand out a fresh access token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken>;
}

/// Token endpoint reply. Only `access_token` is required.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Requests a new token on every call. Nothing is cached.
pub struct TokenClient {
    client: Client,
    token_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl TokenClient {
    pub fn new(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            token_url: config.token_url.clone(),
            client_id: config.consumer_key.clone(),
            client_secret: config.consumer_secret.clone(),
        }
    }
}

#[async_trait]
impl TokenSource for TokenClient {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let token_url = required(&self.token_url, TOKEN_URL)?;
        let client_id = required(&self.client_id, CONSUMER_KEY)?;
        let client_secret = required(&self.client_secret, CONSUMER_SECRET)?;

        debug!("🔑 Requesting client-credentials token from {}", token_url);

        let response = self
            .client
            .post(token_url)
            .basic_auth(client_id, Some(client_secret))
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::TokenRejected { status, body });
        }

        let token: AccessToken = response.json().await?;
        info!(
            token_type = ?token.token_type,
            expires_in = ?token.expires_in,
            "✅ Obtained access token"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubServer, header};

    fn config(token_url: Option<String>) -> ServiceConfig {
        ServiceConfig {
            service_url: None,
            consumer_key: Some("client".to_string()),
            consumer_secret: Some("secret".to_string()),
            token_url,
        }
    }

    #[tokio::test]
    async fn test_fetch_token_sends_client_credentials_grant() {
        let stub = StubServer::start(vec![(
            200,
            r#"{"access_token":"abc123","token_type":"Bearer","expires_in":3600}"#,
        )])
        .await;
        let tokens = TokenClient::new(Client::new(), &config(Some(stub.url("/oauth2/token"))));

        let token = tokens.fetch_token().await.unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.expires_in, Some(3600));

        let requests = stub.finish().await;
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert!(request.starts_with("POST /oauth2/token "));
        assert_eq!(
            header(request, "authorization").as_deref(),
            Some("Basic Y2xpZW50OnNlY3JldA==")
        );
        assert_eq!(
            header(request, "content-type").as_deref(),
            Some("application/x-www-form-urlencoded")
        );
        assert!(request.ends_with("grant_type=client_credentials"));
    }

    #[tokio::test]
    async fn test_minimal_token_body() {
        let stub = StubServer::start(vec![(200, r#"{"access_token":"only"}"#)]).await;
        let tokens = TokenClient::new(Client::new(), &config(Some(stub.url("/token"))));

        let token = tokens.fetch_token().await.unwrap();
        assert_eq!(token.access_token, "only");
        assert!(token.token_type.is_none());
        assert!(token.expires_in.is_none());
        stub.finish().await;
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let stub = StubServer::start(vec![(401, r#"{"error":"invalid_client"}"#)]).await;
        let tokens = TokenClient::new(Client::new(), &config(Some(stub.url("/token"))));

        let err = tokens.fetch_token().await.unwrap_err();
        match err {
            Error::TokenRejected { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("invalid_client"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stub.finish().await.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_token_body() {
        let stub = StubServer::start(vec![(200, "not json")]).await;
        let tokens = TokenClient::new(Client::new(), &config(Some(stub.url("/token"))));

        let err = tokens.fetch_token().await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        stub.finish().await;
    }

    #[tokio::test]
    async fn test_missing_token_url() {
        let tokens = TokenClient::new(Client::new(), &config(None));
        let err = tokens.fetch_token().await.unwrap_err();
        assert!(matches!(err, Error::MissingSetting("TOKEN_URL")));
    }

    #[test]
    fn test_debug_hides_token() {
        let token = AccessToken {
            access_token: "abc123".to_string(),
            token_type: None,
            expires_in: None,
        };
        assert!(!format!("{token:?}").contains("abc123"));
    }
}
