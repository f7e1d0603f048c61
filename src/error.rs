// src/error.rs

//! Unified error handling for the dashboard pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for dashboard operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Entity type with no registered configuration
    #[error("Unknown entity type '{0}'")]
    UnknownEntityType(String),

    /// Read failure against the data source
    #[error("Failed to fetch {context}: {message}")]
    Fetch { context: String, message: String },

    /// Required form fields are missing or malformed
    #[error("Validation failed: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    /// Create/update rejected by the data source
    #[error("Submit failed: {0}")]
    Submit(String),

    /// A stat calculator could not produce a value
    #[error("Stat '{stat}' failed: {message}")]
    Computation { stat: String, message: String },

    /// Record not present in the data source
    #[error("{entity} record {id} not found")]
    NotFound { entity: String, id: i64 },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a fetch error with context.
    pub fn fetch(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a validation error from the offending field labels.
    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a submit error.
    pub fn submit(message: impl fmt::Display) -> Self {
        Self::Submit(message.to_string())
    }

    /// Create a computation error for a named stat.
    pub fn computation(stat: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Computation {
            stat: stat.into(),
            message: message.to_string(),
        }
    }
}
