//! Centralized error types for maillog.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the maillog library.
#[derive(Error, Debug)]
pub enum MaillogError {
    /// The configured backend URL could not be parsed.
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request never produced a response (connection refused, timeout, TLS...).
    #[error("Request to '{url}' failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("Backend returned HTTP {status} for '{url}': {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not a valid list of logs.
    #[error("Malformed response from '{url}': {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    /// No log with the requested id exists in the backend dataset.
    #[error("Log {0} not found")]
    LogNotFound(i64),

    /// I/O error with the associated file path.
    #[error("I/O error writing '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An export operation failed.
    #[error("Export error: {0}")]
    ExportError(String),

    /// The requested export format is not supported.
    #[error("Unknown export format '{0}'. Supported: csv, json, txt")]
    UnknownFormat(String),
}

/// Convenience alias for `Result<T, MaillogError>`.
pub type Result<T> = std::result::Result<T, MaillogError>;

impl MaillogError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for failures reported by the backend itself rather than the transport.
    pub fn is_backend_error(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Decode { .. })
    }
}
