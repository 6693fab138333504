//! Inbound request validation.

use chatrelay_types::chat::ChatRequest;
use chatrelay_types::error::ClassifiedError;
use chatrelay_types::gateway::GatewayEvent;
use serde_json::Value;

/// Parse and validate the body of a chat event.
///
/// Checks run in order: body present, body is a JSON object, `message`
/// non-empty after trimming, `conversationId` non-empty. A `message` that
/// is not a string counts as missing. A numeric `conversationId` is used in
/// its decimal form. No other fields are inspected.
pub fn validate(event: &GatewayEvent) -> Result<ChatRequest, ClassifiedError> {
    let body = event
        .body
        .as_deref()
        .ok_or_else(|| ClassifiedError::validation("Missing request body"))?;

    let value: Value = serde_json::from_str(body)
        .map_err(|_| ClassifiedError::validation("Invalid JSON in request body"))?;

    let Value::Object(fields) = value else {
        return Err(ClassifiedError::validation(
            "Error parsing request: body must be a JSON object",
        ));
    };

    let message = fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if message.is_empty() {
        return Err(ClassifiedError::validation("Message cannot be empty"));
    }

    let conversation_id = parse_conversation_id(fields.get("conversationId"))?;

    Ok(ChatRequest {
        message: message.to_string(),
        conversation_id,
    })
}

fn parse_conversation_id(value: Option<&Value>) -> Result<String, ClassifiedError> {
    let required = || ClassifiedError::validation("conversationId is required");
    match value {
        None | Some(Value::Null) => Err(required()),
        Some(Value::String(id)) if id.is_empty() => Err(required()),
        Some(Value::String(id)) => Ok(id.clone()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(required()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(ClassifiedError::validation(
            "conversationId must be a string or a number",
        )),
    }
}
