//! API-Gateway style request/response envelope.
//!
//! The handler is transport-agnostic: it consumes a [`GatewayEvent`] and
//! produces a [`GatewayResponse`] whose body is already JSON-encoded.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::error::{ClassifiedError, ErrorKind};

pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// The fixed header set attached to every response.
pub fn cors_headers() -> BTreeMap<String, String> {
    [
        (HEADER_ALLOW_ORIGIN, ALLOW_ORIGIN),
        (HEADER_ALLOW_METHODS, ALLOW_METHODS),
        (HEADER_ALLOW_HEADERS, ALLOW_HEADERS),
        (HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// An inbound HTTP-shaped event.
///
/// Unknown fields of a proxy event (headers, path, request context) are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub http_method: Option<String>,
    /// Raw request body. `None` when the event carries no body (or `null`).
    #[serde(default)]
    pub body: Option<String>,
}

impl GatewayEvent {
    pub fn new(http_method: impl Into<String>, body: Option<String>) -> Self {
        Self {
            http_method: Some(http_method.into()),
            body,
        }
    }

    /// True for CORS preflight requests, which are answered without parsing.
    pub fn is_preflight(&self) -> bool {
        self.http_method.as_deref() == Some("OPTIONS")
    }
}

/// The outbound envelope: status, fixed headers, JSON-encoded body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub can_retry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&ClassifiedError> for ErrorBody {
    fn from(err: &ClassifiedError) -> Self {
        Self {
            error: err.message.clone(),
            can_retry: err.can_retry,
            error_type: Some(err.kind),
            details: None,
        }
    }
}
