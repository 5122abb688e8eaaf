//! Error types for pw-client
//!
//! Every failure of a client workflow resolves to one of these variants and
//! leaves the workflow in a retryable state. Nothing is retried automatically.

use thiserror::Error;

/// Message shown when the prediction call exceeds its budget
pub const TIMEOUT_MESSAGE: &str =
    "Request timed out. The service might be starting up; retry shortly.";

/// Message shown when no response arrived at all
pub const NETWORK_MESSAGE: &str =
    "Unable to reach the PredictWell service. Please check your connection and try again later.";

/// Main error type for client workflows
#[derive(Error, Debug)]
pub enum ClientError {
    /// Local input check failed; no request was sent
    #[error("{0}")]
    Validation(String),

    /// Request exceeded its timeout budget or was aborted
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,

    /// Service answered with a non-success status
    ///
    /// `message` is the server-supplied `error` text when the body carried
    /// one, a generic description otherwise.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// No response (connection refused, DNS failure, reset, ...)
    ///
    /// The detail is kept for logs; users see [`NETWORK_MESSAGE`].
    #[error("{}", NETWORK_MESSAGE)]
    Network(String),

    /// Local file I/O while saving a downloaded report
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Server error with a generic message for the given status
    pub fn unexpected_status(status: u16) -> Self {
        Self::Server {
            status,
            message: format!("The service returned an unexpected error (HTTP {}).", status),
        }
    }

    /// Short machine-readable kind, used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Timeout => "timeout",
            Self::Server { .. } => "server",
            Self::Network(_) => "network",
            Self::Io(_) => "io",
        }
    }
}

impl From<pw_common::Error> for ClientError {
    fn from(err: pw_common::Error) -> Self {
        match err {
            pw_common::Error::InvalidInput(msg) => Self::Validation(msg),
            pw_common::Error::Io(e) => Self::Io(e),
            pw_common::Error::Config(msg) => Self::Validation(msg),
        }
    }
}

/// Convenience Result type using ClientError
pub type Result<T> = std::result::Result<T, ClientError>;
