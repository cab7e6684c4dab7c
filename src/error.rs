//! Error types for the img2ascii-client library.
//!
//! Every failure is fatal: a conversion either yields the server's ASCII art
//! or one [`ConvertError`]. Variants fall into three classes, exposed through
//! [`ConvertError::class`]:
//!
//! * [`ErrorClass::FileAccess`] — the local image cannot be read, or the
//!   output file cannot be written.
//! * [`ErrorClass::Network`] — the request could not be completed.
//! * [`ErrorClass::ResponseFormat`] — the server answered, but not with a
//!   JSON object carrying an `ascii` string.
//!
//! Configuration mistakes caught by the builder form a fourth class.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure category of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    FileAccess,
    Network,
    ResponseFormat,
    Config,
}

/// All errors returned by the img2ascii-client library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── File access ───────────────────────────────────────────────────────
    /// Image file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the image.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The image exists but reading it failed.
    #[error("Failed to read image '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create or write the output text file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Network ───────────────────────────────────────────────────────────
    /// Connection refused, DNS failure, or a transport fault mid-exchange.
    #[error("Request to '{url}' failed: {reason}\nIs the conversion server running?")]
    RequestFailed { url: String, reason: String },

    /// The configured request timeout elapsed.
    #[error("Request to '{url}' timed out after {secs}s\nIncrease --timeout.")]
    RequestTimeout { url: String, secs: u64 },

    // ── Response format ───────────────────────────────────────────────────
    /// Body is not JSON, or its `ascii` field is not a string.
    #[error("Malformed response (HTTP {status}): {detail}\nBody starts with: {preview:?}")]
    MalformedResponse {
        status: u16,
        detail: String,
        preview: String,
    },

    /// Body is a JSON object without an `ascii` field.
    #[error("Response (HTTP {status}) has no 'ascii' field{}", server_error_suffix(.server_error))]
    MissingAsciiField {
        status: u16,
        server_error: Option<String>,
    },

    // ── Config ────────────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected internal error (e.g. runtime construction).
    #[error("Internal error: {0}")]
    Internal(String),
}

fn server_error_suffix(server_error: &Option<String>) -> String {
    match server_error {
        Some(msg) => format!("; server said: {msg}"),
        None => String::new(),
    }
}

impl ConvertError {
    /// Which of the failure classes this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            ConvertError::FileNotFound { .. }
            | ConvertError::PermissionDenied { .. }
            | ConvertError::FileReadFailed { .. }
            | ConvertError::OutputWriteFailed { .. } => ErrorClass::FileAccess,
            ConvertError::RequestFailed { .. } | ConvertError::RequestTimeout { .. } => {
                ErrorClass::Network
            }
            ConvertError::MalformedResponse { .. } | ConvertError::MissingAsciiField { .. } => {
                ErrorClass::ResponseFormat
            }
            ConvertError::InvalidConfig(_) | ConvertError::Internal(_) => ErrorClass::Config,
        }
    }
}
