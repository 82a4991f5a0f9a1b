//! auth::errors
//!
//! Authentication error types for GitHub App credentials.
//!
//! # Design
//!
//! Error messages MUST NOT contain the private key, the signed assertion, or
//! the installation token. Variants carry the underlying cause as text so the
//! caller can report it without holding on to secret material.
//!
//! # Example
//!
//! ```
//! use git_connector::auth::AuthError;
//!
//! let err = AuthError::InvalidInstallationId("abc".to_string());
//! assert!(err.to_string().contains("abc"));
//! ```

use thiserror::Error;

/// Errors from GitHub App authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The private key is not a PEM-encoded RSA private key.
    #[error("error loading RSA private key: {0}")]
    InvalidKey(String),

    /// The assertion could not be signed.
    #[error("failed to create JWT token: {0}")]
    Signing(String),

    /// The installation ID is not numeric.
    #[error("failed to parse installation ID '{0}'")]
    InvalidInstallationId(String),

    /// The token endpoint rejected the assertion or could not be reached.
    #[error("failed to exchange JWT for installation access token: {message}")]
    TokenExchangeFailed {
        /// HTTP status returned by the token endpoint, if one was received
        status: Option<u16>,
        /// Underlying cause
        message: String,
    },
}

impl AuthError {
    /// The underlying cause, without the operation prefix.
    pub fn reason(&self) -> &str {
        match self {
            AuthError::InvalidKey(cause)
            | AuthError::Signing(cause)
            | AuthError::InvalidInstallationId(cause) => cause,
            AuthError::TokenExchangeFailed { message, .. } => message,
        }
    }

    /// HTTP status reported by the token endpoint.
    pub fn status(&self) -> Option<u16> {
        match self {
            AuthError::TokenExchangeFailed { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::TokenExchangeFailed {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
