//! Error types for scoopwatch.
//!
//! Frame processing itself never fails; errors only surface while loading
//! configuration or converting untrusted detector output.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    #[error("Malformed detection: {0}")]
    MalformedDetection(String),

    #[error("Unknown stream: {0}")]
    UnknownStream(String),
}

pub type Result<T> = std::result::Result<T, Error>;
