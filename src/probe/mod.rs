//! probe
//!
//! Repository access probes.
//!
//! A probe proves that credentials grant access by asking the remote to
//! enumerate something and checking the answer. Nothing is read beyond the
//! first page or the ref advertisement.
//!
//! # Probes
//!
//! - [`api`]: list repositories through the provider API
//! - [`transport`]: list remote refs over the git transport
//!
//! # Error Handling
//!
//! Both probes report failures as [`AccessError`], which keeps the HTTP
//! status of a rejection when one was received.

pub mod api;
pub mod transport;

use thiserror::Error;

use crate::forge::ForgeError;
use crate::git::GitError;

pub use api::{probe_api_access, probe_installation_access};
pub use transport::{http_credentials, probe_http, probe_ssh, ssh_credentials};

/// Errors from access probes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The provider answered with a non-success status.
    #[error("Received error response from {server} for authentication, status code: {status}")]
    Rejected {
        /// Label of the server that answered
        server: &'static str,
        /// HTTP status of the response
        status: u16,
        /// Message from the response body, if any
        message: Option<String>,
    },

    /// No response was received from the provider API.
    #[error(transparent)]
    NoResponse(#[from] ForgeError),

    /// The HTTP auth method has no secret to present.
    #[error("Token/Password not provided")]
    SecretNotProvided,

    /// The SSH configuration has no usable key.
    #[error("SSH key not provided")]
    SshKeyNotProvided,

    /// The git transport rejected the connection.
    #[error(transparent)]
    Transport(#[from] GitError),
}

impl AccessError {
    /// The underlying cause, without the operation prefix.
    pub fn reason(&self) -> String {
        match self {
            AccessError::Rejected {
                message: Some(message),
                ..
            } => message.clone(),
            AccessError::NoResponse(ForgeError::NetworkError(cause)) => cause.clone(),
            AccessError::Transport(err) => err.reason().to_string(),
            other => other.to_string(),
        }
    }

    /// HTTP status of a rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            AccessError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
