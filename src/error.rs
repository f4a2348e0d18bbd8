use reqwest::StatusCode;
use thiserror::Error;

use crate::config::error::ErrorConfig;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ErrorConfig),

    /// A downstream setting that is only read when a message arrives.
    #[error("{0} is not set")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("token endpoint answered {status}: {body}")]
    TokenRejected { status: StatusCode, body: String },
}
