//! # Common Error Types
//!
//! Consolidated error handling for the catalog client.
//!
//! ## Error Categories
//!
//! - **Validation** ([`ValidationError`]): local, pre-network form checks. These
//!   never reach a server; the controller refuses the submission and shows the
//!   message inline.
//! - **Api** ([`ApiError`]): anything that went wrong talking to a service.
//!   A [`ApiError::Rejected`] response may carry a server message which is
//!   shown verbatim. Transport and decode failures carry none and collapse to
//!   the caller's generic fallback text, so the user cannot tell them apart.
//! - **Storage** ([`StorageError`]): persistence backend failures. The session
//!   gate logs these and carries on with its in-memory flag.
//! - **Config**: invalid configuration at startup.
//!
//! None of these are fatal. Every failure path leaves the UI in an
//! interactive, re-submittable state.
//!
//! ## Usage Pattern
//!
//! ```rust
//! use catalog_client::core::error::ApiError;
//!
//! let rejected = ApiError::Rejected { status: 401, message: Some("Wrong password".to_string()) };
//! assert_eq!(rejected.user_message("Could not reach the server"), "Wrong password");
//!
//! let offline = ApiError::Transport("connection refused".to_string());
//! assert_eq!(offline.user_message("Could not reach the server"), "Could not reach the server");
//! ```

use thiserror::Error;

/// Local form validation failure.
///
/// The `Display` text is exactly what ends up in the form's inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

/// Failure talking to the auth or catalog service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    ///
    /// `message` is the server-provided text when the body carried one.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    /// No response at all (connection refused, timeout, DNS).
    #[error("network error: {0}")]
    Transport(String),

    /// A success status with a body we could not read.
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Server-provided message, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            ApiError::Transport(_) | ApiError::Decode(_) => None,
        }
    }

    /// Text to show the user: the server's message verbatim, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Session store persistence failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage format error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Config error: {0}")]
    Config(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;
