//! validate::errors
//!
//! The single error type the orchestrator translates into a response.

use thiserror::Error;

use crate::core::verify::ConfigError;
use crate::forge::ClientError;
use crate::probe::AccessError;

/// Any failure during a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Structural problem in the request configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The API client could not be built.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// The remote refused or never answered a probe.
    #[error(transparent)]
    Access(#[from] AccessError),
}

impl ValidationError {
    /// Innermost cause of the failure.
    ///
    /// Equal to the message when there is no deeper cause.
    pub fn reason(&self) -> String {
        match self {
            ValidationError::Config(err) => err.to_string(),
            ValidationError::Client(err) => err.reason(),
            ValidationError::Access(err) => err.reason(),
        }
    }

    /// Remote HTTP status carried by the failure, 0 when there is none.
    pub fn code(&self) -> i32 {
        let status = match self {
            ValidationError::Config(_) => None,
            ValidationError::Client(err) => err.status(),
            ValidationError::Access(err) => err.status(),
        };
        status.map(i32::from).unwrap_or(0)
    }
}
