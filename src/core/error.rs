//! Error types for core module
//!
//! Covers loading and saving the controller configuration file.

use thiserror::Error;

/// Errors that can occur in the core module
#[derive(Error, Debug)]
pub enum CoreError {
    /// Config file I/O error
    #[error("Config I/O error: {0}")]
    ConfigIo(#[from] std::io::Error),

    /// Config serialization/deserialization error
    #[error("Config serialization error: {0}")]
    ConfigSerialization(#[from] serde_json::Error),

    /// Config parsed but holds values the controller cannot run with
    #[error("Invalid config: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
