//! Error type definitions for the M3U loader
//!
//! Fetch failures are classified into a small taxonomy so that the web layer
//! can map each class to a status code without inspecting messages.

use axum::http::StatusCode;
use thiserror::Error;

use crate::utils::url::UrlUtils;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Playlist retrieval errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Page rendering errors
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Why a transport-level failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// DNS, connect, TLS or body read failure
    Transport,
    /// The configured or supplied timeout elapsed
    Timeout,
    /// The caller cancelled the request
    Cancelled,
    /// The body exceeded the configured size cap
    BodyTooLarge,
}

impl NetworkErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport failure",
            Self::Timeout => "request timed out",
            Self::Cancelled => "request cancelled",
            Self::BodyTooLarge => "playlist too large",
        }
    }
}

impl std::fmt::Display for NetworkErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Playlist retrieval errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Malformed URL or a scheme other than http/https. Never reaches the network.
    #[error("Invalid source '{input}': {reason}")]
    InvalidSource { input: String, reason: String },

    /// The origin answered with a status outside 200..=299
    #[error("Upstream returned HTTP {status}")]
    Upstream { status: u16 },

    /// Connection, DNS, timeout, cancellation or body failure
    #[error("Network error ({kind}): {message}")]
    Network {
        kind: NetworkErrorKind,
        message: String,
    },
}

impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl FetchError {
    pub fn invalid_source<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::InvalidSource {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn network<M: Into<String>>(kind: NetworkErrorKind, message: M) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout<M: Into<String>>(message: M) -> Self {
        Self::network(NetworkErrorKind::Timeout, message)
    }

    /// HTTP status the web layer answers with for this failure
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSource { .. } => StatusCode::BAD_REQUEST,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Network { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short plain-text message safe to show to the caller
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidSource { .. } => "Error: Invalid URL.".to_string(),
            Self::Upstream { status } => format!("Error: Failed to load M3U ({status})"),
            Self::Network { kind, .. } => format!("Error: {kind}"),
        }
    }

    /// Whether a caller may reasonably try the same request again
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidSource { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                kind: NetworkErrorKind::Timeout,
                ..
            }
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            NetworkErrorKind::Timeout
        } else {
            NetworkErrorKind::Transport
        };
        // reqwest includes the request URL in its messages
        Self::network(kind, UrlUtils::obfuscate_credentials(&err.to_string()))
    }
}
