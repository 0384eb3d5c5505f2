//! Error types for Nudge.
//!
//! This module defines the crate-level error type, wrapping the per-module
//! failures with clear, human-readable messages.

use thiserror::Error;

use crate::client::ClientError;
use crate::config::ConfigError;

/// Errors that can occur during Nudge operations.
#[derive(Error, Debug)]
pub enum NudgeError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote todo store error.
    #[error("store error: {0}")]
    Store(#[from] ClientError),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for Nudge operations.
pub type Result<T> = std::result::Result<T, NudgeError>;
