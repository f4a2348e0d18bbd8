pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod oauth;
pub mod rabbitmq;

#[cfg(test)]
mod test_support;
