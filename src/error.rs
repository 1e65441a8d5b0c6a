// src/error.rs

//! Unified error handling for the notice board crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed (network, non-2xx status or timeout)
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

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Expected HTML structure was not found
    #[error("Parse error for {context}: {message}")]
    Parse { context: String, message: String },

    /// Persisted store could not be read or written
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a structural parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error came from unexpected page structure rather than transport.
    ///
    /// An href that does not resolve to a URL counts as page structure.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Parse { .. } | Self::Url(_))
    }

    /// Whether this error came from fetching a page or attachment.
    ///
    /// `Io` is included because a streamed body that breaks mid-read
    /// surfaces as an I/O error.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Io(_))
    }

    /// Whether a single notice failing with this error may be skipped.
    pub fn is_notice_failure(&self) -> bool {
        self.is_structural() || self.is_transport()
    }
}
