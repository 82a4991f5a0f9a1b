//! forge::errors
//!
//! Errors from building an API client.

use thiserror::Error;

use crate::auth::AuthError;

/// Errors from the client factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The provider has no client implementation.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The API access type has no credential wiring.
    #[error("API access type {0} is not implemented")]
    Unimplemented(String),

    /// The configured proxy URL cannot be parsed.
    #[error("invalid proxy URL '{url}': {message}")]
    InvalidProxy { url: String, message: String },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Transport(String),

    /// GitHub App token exchange failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ClientError {
    /// The underlying cause, without the operation prefix.
    pub fn reason(&self) -> String {
        match self {
            ClientError::InvalidProxy { message, .. } => message.clone(),
            ClientError::Transport(message) => message.clone(),
            ClientError::Auth(err) => err.reason().to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Auth(err) => err.status(),
            _ => None,
        }
    }
}
