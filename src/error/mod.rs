//! Error handling module

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Router rejected operation: {0}")]
    Operation(serde_json::Value),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
