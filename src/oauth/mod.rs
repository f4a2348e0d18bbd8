pub mod service;
pub mod token;

pub use service::{ServiceCaller, ServiceClient, ServiceResponse};
pub use token::{AccessToken, TokenClient, TokenSource};

use reqwest::Client;

use crate::error::Result;

/// Shared HTTP client; no request timeout is configured
pub fn http_client() -> Result<Client> {
    Ok(Client::builder().build()?)
}
