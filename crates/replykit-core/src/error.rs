use core::result::Result as CoreResult;
use std::io::Error as IoError;
use std::time::Duration;

use reqwest::Error as ReqwestError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for core operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur while generating replies or touching local storage.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// An HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] ReqwestError),

    /// JSON serialization or deserialization failed.
    #[error("JSON serialization error: {0}")]
    Json(#[from] SerdeJsonError),

    /// TOML deserialization failed.
    #[error("TOML deserialization error: {0}")]
    Toml(#[from] TomlError),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chat-completion endpoint reported an error.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The endpoint returned a body that could not be understood.
    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    /// No content arrived before the deadline.
    #[error("Generation timed out after {}s without content", .0.as_secs())]
    Timeout(Duration),

    /// The local key-value storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The caller supplied unusable input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A general error not covered by other variants.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Determines whether this error may succeed if retried.
    ///
    /// Returns `true` for transient errors like network failures, provider
    /// errors or timeouts.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Request(_) | Self::Provider(_) | Self::Timeout(_)
        )
    }
}
