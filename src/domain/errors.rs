//! Domain error types
//!
//! This module defines the error hierarchy for Spacedump.
//! Errors are domain-specific and don't expose third-party types.

use crate::core::runlog::LogEntry;
use std::fmt;
use thiserror::Error;

/// Main Spacedump error type
///
/// This is the primary error type used throughout the application.
/// Step failures, API failures and the end-of-run aggregate failure all
/// travel through this type.
#[derive(Debug, Error)]
pub enum SpacedumpError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Pipeline wiring errors (a step read a context field no earlier step wrote)
    #[error("Pipeline error: {0}")]
    Pipeline(String),

    /// A pipeline step failed and aborted the run
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: Box<SpacedumpError>,
    },

    /// The run recorded one or more error-severity log entries
    #[error(transparent)]
    Aggregate(#[from] MultiError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl SpacedumpError {
    /// Short machine-friendly name of the error kind, used in the error log
    pub fn kind_name(&self) -> &'static str {
        match self {
            SpacedumpError::Configuration(_) => "ConfigurationError",
            SpacedumpError::Api(_) => "ApiError",
            SpacedumpError::Pipeline(_) => "PipelineError",
            SpacedumpError::StepFailed { source, .. } => source.kind_name(),
            SpacedumpError::Aggregate(_) => MultiError::NAME,
            SpacedumpError::Serialization(_) => "SerializationError",
            SpacedumpError::Io(_) => "IoError",
            SpacedumpError::Other(_) => "Error",
        }
    }

    /// Wrap this error as the failure of the named step
    pub fn in_step(self, step: impl Into<String>) -> Self {
        SpacedumpError::StepFailed {
            step: step.into(),
            source: Box::new(self),
        }
    }
}

/// Remote API errors
///
/// Errors that occur when talking to the management or delivery API.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the server
    #[error("Failed to connect to {0}")]
    ConnectionFailed(String),

    /// Authentication or authorization rejected
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Request timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited(message),
            500..=599 => ApiError::ServerError { status, message },
            _ => ApiError::ClientError { status, message },
        }
    }
}

/// Aggregate failure raised once at the end of a run
///
/// Carries every error-severity entry recorded during the run.
#[derive(Debug, Clone)]
pub struct MultiError {
    /// Every error-severity log entry of the run, in record order
    pub errors: Vec<LogEntry>,
}

impl MultiError {
    /// Name reported for the aggregate failure
    pub const NAME: &'static str = "SpacedumpMultiError";

    /// Creates a new aggregate failure
    pub fn new(errors: Vec<LogEntry>) -> Self {
        Self { errors }
    }

    /// Number of error entries carried
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether the aggregate carries no entries
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Errors occurred ({} error(s) recorded)", self.errors.len())
    }
}

impl std::error::Error for MultiError {}

// Conversion from std::io::Error
impl From<std::io::Error> for SpacedumpError {
    fn from(err: std::io::Error) -> Self {
        SpacedumpError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SpacedumpError {
    fn from(err: serde_json::Error) -> Self {
        SpacedumpError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SpacedumpError {
    fn from(err: toml::de::Error) -> Self {
        SpacedumpError::Configuration(format!("TOML parse error: {err}"))
    }
}
