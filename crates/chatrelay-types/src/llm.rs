//! LLM request/response types for chatrelay.
//!
//! These types model the data shapes for LLM provider interactions:
//! completion requests, usage tracking, and provider failures.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on generated tokens for every chat completion.
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

/// Role of a message in an LLM conversation.
///
/// Doubles as the `sender` of a stored conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Map a stored sender value onto a role.
    ///
    /// Only `user` maps to [`MessageRole::User`]; anything else is treated
    /// as the assistant.
    pub fn from_sender(sender: &str) -> Self {
        if sender == "user" {
            MessageRole::User
        } else {
            MessageRole::Assistant
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
}

/// Response from an LLM provider for a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    /// The first text segment of the response.
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the LLM stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    Other,
}

impl StopReason {
    /// Parse a provider stop reason, defaulting to `EndTurn` when absent.
    pub fn from_provider(value: Option<&str>) -> Self {
        match value {
            None | Some("end_turn") => StopReason::EndTurn,
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            Some(_) => StopReason::Other,
        }
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::StopSequence => write!(f, "stop_sequence"),
            StopReason::Other => write!(f, "other"),
        }
    }
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from LLM provider operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    /// A structured error returned by the provider API.
    ///
    /// `message` is the provider's own message field; `error_type` is the
    /// provider's error code (e.g. `rate_limit_error`, `ThrottlingException`).
    #[error("HTTP {status} {error_type}: {message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider overloaded: {0}")]
    Overloaded(String),

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("No content in {0} response")]
    EmptyResponse(String),
}

impl LlmError {
    /// The provider's own error message, when the provider returned one.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            LlmError::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Type of LLM provider backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderType {
    /// Managed inference through AWS Bedrock.
    #[default]
    Bedrock,
    /// The Anthropic Messages API, called directly.
    Anthropic,
}

impl ProviderType {
    /// Human-readable backend name, as it appears in user-facing messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderType::Bedrock => "Bedrock",
            ProviderType::Anthropic => "Anthropic",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::Bedrock => write!(f, "bedrock"),
            ProviderType::Anthropic => write!(f, "anthropic"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bedrock" => Ok(ProviderType::Bedrock),
            "anthropic" => Ok(ProviderType::Anthropic),
            other => Err(format!("invalid provider type: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::User, MessageRole::Assistant] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_from_sender_maps_unknown_to_assistant() {
        assert_eq!(MessageRole::from_sender("user"), MessageRole::User);
        assert_eq!(MessageRole::from_sender("assistant"), MessageRole::Assistant);
        assert_eq!(MessageRole::from_sender("bot"), MessageRole::Assistant);
        assert_eq!(MessageRole::from_sender("USER"), MessageRole::Assistant);
    }

    #[test]
    fn test_message_serde() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn test_stop_reason_from_provider() {
        assert_eq!(StopReason::from_provider(None), StopReason::EndTurn);
        assert_eq!(StopReason::from_provider(Some("max_tokens")), StopReason::MaxTokens);
        assert_eq!(StopReason::from_provider(Some("tool_use")), StopReason::Other);
    }

    #[test]
    fn test_api_error_display_carries_provider_message() {
        let err = LlmError::Api {
            status: 400,
            error_type: "invalid_request_error".to_string(),
            message: "Your credit balance is too low".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 400 invalid_request_error: Your credit balance is too low"
        );
        assert_eq!(err.provider_message(), Some("Your credit balance is too low"));
    }

    #[test]
    fn test_provider_message_absent_for_transport_errors() {
        let err = LlmError::Provider {
            message: "connection reset".to_string(),
        };
        assert!(err.provider_message().is_none());
        assert!(LlmError::AuthenticationFailed.provider_message().is_none());
    }

    #[test]
    fn test_provider_type_roundtrip() {
        for pt in [ProviderType::Bedrock, ProviderType::Anthropic] {
            let parsed: ProviderType = pt.to_string().parse().unwrap();
            assert_eq!(pt, parsed);
        }
        assert_eq!(ProviderType::default(), ProviderType::Bedrock);
    }
}
