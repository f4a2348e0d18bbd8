use thiserror::Error;
use tracing_subscriber::util::TryInitError;

pub type Result<T> = std::result::Result<T, ErrorConfig>;

#[derive(Error, Debug)]
pub enum ErrorConfig {
    #[error("One or many environment variables was/were not set: {}", .0.join(", "))]
    MissingVars(Vec<&'static str>),

    #[error(transparent)]
    Subscriber(#[from] TryInitError),
}
