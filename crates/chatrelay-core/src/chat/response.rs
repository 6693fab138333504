//! Wraps handler outcomes into the gateway response envelope.
//!
//! Every response carries the same CORS and content-type headers.

use chatrelay_types::chat::ChatResponse;
use chatrelay_types::error::ClassifiedError;
use chatrelay_types::gateway::{ErrorBody, GatewayResponse, cors_headers};
use serde::Serialize;
use tracing::error;

const SERIALIZATION_FAILURE_BODY: &str =
    r#"{"error":"Failed to encode response","canRetry":true,"errorType":"system_error"}"#;

fn json_response<T: Serialize>(status_code: u16, body: &T) -> GatewayResponse {
    match serde_json::to_string(body) {
        Ok(body) => GatewayResponse {
            status_code,
            headers: cors_headers(),
            body,
        },
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            GatewayResponse {
                status_code: 500,
                headers: cors_headers(),
                body: SERIALIZATION_FAILURE_BODY.to_string(),
            }
        }
    }
}

/// 200 with the chat response body.
pub fn success(body: &ChatResponse) -> GatewayResponse {
    json_response(200, body)
}

/// An error response with the classified error as its body.
pub fn error(status_code: u16, err: &ClassifiedError) -> GatewayResponse {
    json_response(status_code, &ErrorBody::from(err))
}

/// An error response that also carries a `details` object.
pub fn error_with_details(
    status_code: u16,
    err: &ClassifiedError,
    details: serde_json::Value,
) -> GatewayResponse {
    let body = ErrorBody {
        details: Some(details),
        ..ErrorBody::from(err)
    };
    json_response(status_code, &body)
}

/// Answer to a CORS preflight: 200, headers only.
pub fn preflight() -> GatewayResponse {
    GatewayResponse {
        status_code: 200,
        headers: cors_headers(),
        body: String::new(),
    }
}
