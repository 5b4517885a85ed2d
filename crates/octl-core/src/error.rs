//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No client ID has been configured.
    #[error("not configured - run 'octl auth login --client-id <your-id>' first")]
    NotConfigured,

    /// No usable sign-in state is stored.
    #[error("not logged in - run 'octl auth login' first")]
    NotLoggedIn,

    /// `OAuth2` flow failed.
    #[error("authentication failed: {0}")]
    OAuth(#[from] octl_oauth::Error),

    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Microsoft Graph returned an error response.
    #[error("Microsoft Graph request failed ({status}): {code}: {message}")]
    Graph {
        /// HTTP status code.
        status: u16,
        /// Graph error code (e.g. `ErrorItemNotFound`).
        code: String,
        /// Human-readable message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage error.
    #[error("Credential error: {0}")]
    Credential(#[from] crate::auth::credentials::CredentialError),

    /// Caller supplied an invalid value.
    #[error("{0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns true if the error means the remote object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Graph { status: 404, .. })
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
