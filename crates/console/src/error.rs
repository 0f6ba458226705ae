use keystone_core::{CoreError, PermissionDenied};
use keystone_http::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),

    #[error("API request failed: {0}")]
    Client(#[from] ClientError),

    #[error("View has been torn down")]
    TornDown,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
