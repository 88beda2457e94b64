use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Hard construction-time failures. Expected judge-side failures (transport,
/// parse, missing rows) never surface here; they are reported as statuses on
/// the returned entities.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to build http client")]
    Client(#[from] reqwest::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("malformed account list")]
    AccountFormat(#[from] serde_yaml::Error),
}
