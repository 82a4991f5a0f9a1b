//! core::response
//!
//! Validation verdict returned to the caller.
//!
//! A [`ValidationResponse`] is built once per request and serialized once.
//! Only [`ResponseStatus::Success`] and [`ResponseStatus::Failure`] are
//! produced today; the other statuses are part of the wire contract.

use serde::{Deserialize, Serialize};

/// Overall verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failure,
    Partial,
    Unknown,
    Pending,
}

/// One reported error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Underlying cause.
    pub reason: String,
    /// User-facing message.
    pub message: String,
    /// HTTP status associated with the failure, 0 when there is none.
    pub code: i32,
}

/// Response body for every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
    #[serde(default)]
    pub error_summary: String,
}

impl ValidationResponse {
    /// A successful verdict with no errors.
    pub fn success() -> Self {
        Self {
            status: ResponseStatus::Success,
            errors: Vec::new(),
            error_summary: String::new(),
        }
    }

    /// A failed verdict carrying a single error.
    pub fn failure(detail: ErrorDetail, summary: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failure,
            errors: vec![detail],
            error_summary: summary.into(),
        }
    }

    /// Whether the verdict is a success.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
