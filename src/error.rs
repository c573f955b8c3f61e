//! Error Types
//!
//! Errors raised while loading configuration and talking to the seller data API.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lingxing-smoke operations
#[derive(Debug, Error)]
pub enum LingxingError {
    /// Configuration file does not exist
    #[error("Config file {} does not exist", .path.display())]
    NotFound { path: PathBuf },

    /// Configuration file is not valid JSON of the expected shape
    #[error("Config file {} is malformed: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// Any other failure while reading the configuration file
    #[error("Failed to load config file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Semantic misconfiguration (missing credentials, proxy without URL)
    #[error("Invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Client could not be built from the given options
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    Request(String),

    /// Response could not be decoded
    #[error("Response error: {0}")]
    Response(String),

    /// Authentication failed or no token was acquired
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Gateway answered with a non-success code
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// Rate limited and not allowed (or no longer allowed) to wait it out
    #[error("Rate limited by the API after {retries} retries")]
    RateLimited { retries: u32 },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Writing the console report failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl From<reqwest::Error> for LingxingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LingxingError::Timeout(err.to_string())
        } else if err.is_connect() {
            LingxingError::Request(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            LingxingError::Response(format!("Failed to decode response: {}", err))
        } else {
            LingxingError::Request(err.to_string())
        }
    }
}

/// Result type alias for lingxing-smoke operations
pub type Result<T> = std::result::Result<T, LingxingError>;
