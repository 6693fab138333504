//! Chat endpoints: the REST-style `/chat` route and the raw `/invoke` route.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};

use chatrelay_core::chat::response;
use chatrelay_types::error::ClassifiedError;
use chatrelay_types::gateway::GatewayEvent;

use crate::http::response::GatewayReply;
use crate::state::AppState;

/// POST|OPTIONS /chat
///
/// Builds a gateway event from the method and raw body. An empty body is
/// treated as absent.
pub async fn chat(State(state): State<AppState>, method: Method, body: Bytes) -> GatewayReply {
    let body = (!body.is_empty()).then(|| String::from_utf8_lossy(&body).into_owned());
    let event = GatewayEvent::new(method.as_str(), body);

    GatewayReply(state.chat_handler.handle(&event).await)
}

/// Any other method on /chat.
pub async fn method_not_allowed(method: Method) -> GatewayReply {
    GatewayReply(response::error(
        405,
        &ClassifiedError::validation(format!("Method {method} is not allowed")),
    ))
}

/// POST /invoke
///
/// Accepts a proxy event (`{"httpMethod": .., "body": ..}`) and returns the
/// `{statusCode, headers, body}` envelope as JSON, as a function runtime would.
/// The content type is not checked. An unreadable event is answered with a
/// CORS-carrying 400 instead of the envelope.
pub async fn invoke(State(state): State<AppState>, body: Bytes) -> Response {
    let event: GatewayEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed proxy event");
            return GatewayReply(response::error(
                400,
                &ClassifiedError::validation(format!("Invalid proxy event: {e}")),
            ))
            .into_response();
        }
    };

    Json(state.chat_handler.handle(&event).await).into_response()
}
