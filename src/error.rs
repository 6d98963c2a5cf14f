//! Error types for autoagile
//!
//! This module defines all error types used throughout the client,
//! using `thiserror` for ergonomic error handling.
//!
//! User-facing failures fall into four categories (see [`ErrorKind`]):
//! validation errors caught before any network call, transport errors
//! where the server could not be reached, server errors carrying a
//! non-2xx status, and contract errors where a 2xx response did not
//! match the expected JSON shape.

use std::fmt;
use thiserror::Error;

/// Main error type for autoagile operations
#[derive(Error, Debug)]
pub enum AutoAgileError {
    /// Input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// The request never produced a response
    #[error("Could not reach the server: {0}. Check your connection and that the server is running.")]
    Transport(String),

    /// Non-2xx response, or a 2xx response explicitly reporting failure
    #[error("{message}")]
    Server {
        /// HTTP status code of the response
        status: u16,
        /// Server-supplied message, or a generic status-coded message
        message: String,
        /// Optional detail lines supplied by the server
        details: Vec<String>,
    },

    /// 2xx response whose body did not match the expected shape
    #[error("{0}")]
    Contract(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Interactive shell command errors
    #[error("Command error: {0}")]
    Command(#[from] crate::commands::shell_commands::CommandError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP client errors outside request dispatch (e.g. client construction)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Category of a user-facing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing file, missing selection, empty list for a bulk action
    Validation,
    /// Request could not reach the server
    Transport,
    /// Non-2xx status
    Server,
    /// 2xx response that failed to match the expected shape
    Contract,
    /// Anything else (config, IO, local serialization)
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Transport => write!(f, "transport"),
            Self::Server => write!(f, "server"),
            Self::Contract => write!(f, "contract"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

impl AutoAgileError {
    /// Build a server error with the generic status-coded message
    pub fn server_status(status: u16) -> Self {
        Self::Server {
            status,
            message: format!("Server error {}", status),
            details: Vec::new(),
        }
    }

    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Command(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Server { .. } => ErrorKind::Server,
            Self::Contract(_) => ErrorKind::Contract,
            _ => ErrorKind::Internal,
        }
    }
}

/// Classify an `anyhow` error produced by this crate
///
/// Errors that did not originate from [`AutoAgileError`] are reported as
/// [`ErrorKind::Internal`].
pub fn error_kind(err: &anyhow::Error) -> ErrorKind {
    err.downcast_ref::<AutoAgileError>()
        .map(AutoAgileError::kind)
        .unwrap_or(ErrorKind::Internal)
}

/// Result type alias for autoagile operations
///
/// Uses `anyhow::Error` so that context can be attached while the
/// underlying [`AutoAgileError`] stays reachable via `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
