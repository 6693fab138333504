//! AWS Bedrock request and error types.
//!
//! Bedrock uses the same Claude Messages API JSON format as the direct
//! Anthropic API, but with two differences:
//! - The `model` field is omitted from the request body (it goes in the URL path).
//! - An `anthropic_version` field is required in the request body.
//!
//! The response type is reused from `super::anthropic::types`.

use serde::Serialize;

use super::super::anthropic::types::AnthropicMessage;

/// Request body for AWS Bedrock Claude invoke.
#[derive(Debug, Clone, Serialize)]
pub struct BedrockRequest {
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// Pull the human-readable message out of a Bedrock error body.
///
/// Bedrock runtime errors are usually `{"message": "...", "__type": "..."}`,
/// but older endpoints use `Message`, `errorMessage` or a nested `error.message`.
pub fn error_message(body: &str) -> Option<String> {
    let json = serde_json::from_str::<serde_json::Value>(body).ok()?;

    let message = json
        .get("message")
        .and_then(|v| v.as_str())
        .or_else(|| json.get("Message").and_then(|v| v.as_str()))
        .or_else(|| json.get("errorMessage").and_then(|v| v.as_str()))
        .or_else(|| {
            json.get("error")
                .and_then(|v| v.get("message"))
                .and_then(|v| v.as_str())
        })
        .map(|s| s.trim().to_string())?;

    (!message.is_empty()).then_some(message)
}

/// The error code from the body's `__type`, or from the `x-amzn-ErrorType`
/// header value (`ThrottlingException:http://internal.amazon.com/...`).
pub fn error_type(body: &str, header: Option<&str>) -> Option<String> {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("__type").and_then(|v| v.as_str()).map(str::to_string));

    from_body
        .or_else(|| header.map(str::to_string))
        .map(|raw| {
            // Both forms may carry a namespace or URL suffix.
            let code = raw.split(':').next().unwrap_or(&raw);
            code.rsplit('#').next().unwrap_or(code).trim().to_string()
        })
        .filter(|s| !s.is_empty())
}
