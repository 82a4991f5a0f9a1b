//! handler
//!
//! Request dispatch.
//!
//! Decodes the request envelope, rejects malformed requests with HTTP 400
//! and hands `validate` requests to the [`Validator`]. Validation verdicts,
//! successful or not, are HTTP 200.

use tracing::{debug, error};

use crate::core::response::{ErrorDetail, ValidationResponse};
use crate::core::types::RequestData;
use crate::validate::Validator;

/// HTTP status for a dispatched request.
pub const STATUS_OK: u16 = 200;

/// HTTP status for a malformed request.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Status and body to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status: u16,
    pub body: ValidationResponse,
}

impl HandlerResponse {
    fn ok(body: ValidationResponse) -> Self {
        Self {
            status: STATUS_OK,
            body,
        }
    }

    /// A failure body with a single error, as sent for rejected requests.
    pub fn error(status: u16, reason: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            body: ValidationResponse::failure(
                ErrorDetail {
                    reason: reason.into(),
                    message: message.clone(),
                    code: i32::from(status),
                },
                message,
            ),
        }
    }

    fn bad_request(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(STATUS_BAD_REQUEST, reason, message)
    }
}

/// Handle one raw request body.
pub async fn handle_request(body: &[u8], validator: &Validator) -> HandlerResponse {
    let request: RequestData = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            error!(error = %e, "Failed to decode request body");
            return HandlerResponse::bad_request(e.to_string(), "Failed to decode request body");
        }
    };

    let Some(params) = request.params.as_ref() else {
        error!("Connector params are missing");
        return HandlerResponse::bad_request("missing connector params", "Connector params are missing");
    };

    if params.repo.is_empty() {
        error!("Validation repository URL is missing");
        return HandlerResponse::bad_request(
            "empty validation repository url",
            "Validation repository URL is missing",
        );
    }

    let operation = request.operation.to_lowercase();
    debug!(operation = %operation, provider = %request.provider, "dispatching request");

    match operation.as_str() {
        "validate" => HandlerResponse::ok(validator.validate(&request.provider, params).await),
        _ => {
            let message = format!("The specified action {} is not supported", operation);
            error!("{}", message);
            HandlerResponse::bad_request("invalid action", message)
        }
    }
}
