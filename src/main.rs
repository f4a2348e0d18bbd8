use anyhow::Result;
use choreo_listener::{app, config};
use rustls::crypto::{CryptoProvider, ring::default_provider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    _ = CryptoProvider::install_default(default_provider());
    config::init()?;

    app::run(config::env_var).await
}
