//! Rendering of gateway responses as axum responses.

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use chatrelay_types::gateway::GatewayResponse;

/// Axum wrapper around a [`GatewayResponse`].
///
/// Status, headers, and body are copied through unchanged. Header pairs that
/// are not valid HTTP are dropped with a warning.
pub struct GatewayReply(pub GatewayResponse);

impl IntoResponse for GatewayReply {
    fn into_response(self) -> Response {
        let GatewayResponse {
            status_code,
            headers,
            body,
        } = self.0;

        let mut response = Response::new(Body::from(body));
        *response.status_mut() =
            StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        for (name, value) in headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                (Ok(name), Ok(value)) => {
                    response.headers_mut().insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::gateway::cors_headers;

    #[test]
    fn reply_copies_status_and_headers() {
        let response = GatewayReply(GatewayResponse {
            status_code: 400,
            headers: cors_headers(),
            body: r#"{"error":"Missing request body"}"#.to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert_eq!(response.headers()["content-type"], "application/json");
    }

    #[test]
    fn unknown_status_becomes_500() {
        let response = GatewayReply(GatewayResponse {
            status_code: 42,
            headers: Default::default(),
            body: String::new(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
