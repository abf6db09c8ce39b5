//! Error types for the Curator pipeline.
//!
//! Errors are organized by concern: configuration problems on one side,
//! curation-run failures on the other. Only `CurationError::RateLimited`
//! is ever recovered from during a run; everything else propagates.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Curator operations.
#[derive(Error, Debug)]
pub enum CuratorError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Curation run errors
    #[error("Curation error: {0}")]
    Curation(#[from] CurationError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while curating directories.
#[derive(Error, Debug)]
pub enum CurationError {
    /// The API key file could not be read
    #[error("API credentials not found at {path}")]
    MissingCredentials { path: PathBuf },

    /// The prompt file could not be read
    #[error("Failed to read prompt file {path}: {message}")]
    Prompt { path: PathBuf, message: String },

    /// The label file length does not match the image count
    #[error("Label count {labels} does not match file count {files} in {dir}")]
    LabelCountMismatch {
        dir: PathBuf,
        labels: usize,
        files: usize,
    },

    /// The inference service response lacked the expected completion text.
    /// Treated as throttling: the response shape of a rate-limit error body.
    #[error("Inference service is rate limiting requests")]
    RateLimited,

    /// HTTP transport failure talking to the inference service
    #[error("Request to inference service failed: {message}")]
    Http { message: String },

    /// An image file could not be read for dispatch
    #[error("Failed to read image {path}: {message}")]
    ImageRead { path: PathBuf, message: String },

    /// Similarity scoring failed
    #[error("Similarity scoring failed: {message}")]
    Scoring { message: String },

    /// Ledger load/save failure
    #[error("Ledger error for {path}: {message}")]
    Ledger { path: PathBuf, message: String },

    /// Label file read failure
    #[error("Failed to read labels at {path}: {message}")]
    Labels { path: PathBuf, message: String },

    /// Directory enumeration and other I/O failures
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Curator results.
pub type Result<T> = std::result::Result<T, CuratorError>;

/// Convenience type alias for curation-specific results.
pub type CurationResult<T> = std::result::Result<T, CurationError>;
