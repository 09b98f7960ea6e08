//! auth::errors
//!
//! Error types for the OAuth token acquisition flow.
//!
//! # Design
//!
//! Error messages never contain token values. The browser callback may
//! carry an authorization code, and the exchange returns an access token;
//! neither is interpolated into any variant.
//!
//! # Example
//!
//! ```
//! use gitutil::auth::AuthError;
//! use std::time::Duration;
//!
//! let err = AuthError::CallbackTimeout(Duration::from_secs(300));
//! assert!(err.to_string().contains("300"));
//! assert!(!err.to_string().contains("gho_"));
//! ```

use std::time::Duration;

use thiserror::Error;

/// Errors from OAuth operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client id or secret not provided by flag, environment, or config.
    #[error("missing OAuth {0}. Pass it as a flag, set the environment variable, or add it to [oauth] in the config file.")]
    MissingCredentials(String),

    /// GitHub rejected the code exchange.
    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Network error talking to GitHub.
    #[error("network error: {0}")]
    Network(String),

    /// GitHub returned a response that is neither a token nor an OAuth error.
    #[error("GitHub API error: {status} - {message}")]
    GitHubApi {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The local callback listener could not be started or failed.
    #[error("callback listener error: {0}")]
    CallbackListener(String),

    /// No callback arrived in time.
    #[error("no OAuth callback received within {0:?}")]
    CallbackTimeout(Duration),

    /// The listener stopped without producing a result.
    #[error("callback listener stopped before a token was received")]
    CallbackClosed,

    /// The authorization URL could not be built.
    #[error("invalid OAuth URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Network(err.to_string())
    }
}
