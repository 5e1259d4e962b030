//! Library-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PledgeError {
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Checkout requires additional action but carries no client secret")]
    MissingClientSecret,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PledgeError>;
