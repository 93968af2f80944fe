//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    /// Destination could not be activated
    #[error("Destination '{destination}' has no active backend")]
    SinkInactive { destination: String },

    /// Input could not be read
    #[error("Failed to read input: {0}")]
    Input(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    pub fn sink_inactive(destination: impl Into<String>) -> Self {
        Self::SinkInactive {
            destination: destination.into(),
        }
    }
}
