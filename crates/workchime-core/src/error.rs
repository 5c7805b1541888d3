//! Core error types for workchime-core.
//!
//! Side-effect failures (sound, notifications) are deliberately not modeled
//! here: they are logged at the call site and never reach scheduler state.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for workchime-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Runtime state persistence errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Runtime state persistence errors.
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to read the runtime state snapshot
    #[error("Failed to read state from {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// Failed to write the runtime state snapshot
    #[error("Failed to write state to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Failed to take the advisory lock guarding the snapshot
    #[error("Failed to lock {path}: {message}")]
    LockFailed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
