//! Maps raw backend failures onto the shared [`ErrorKind`] taxonomy.
//!
//! Matching is a case-insensitive substring search over the error text,
//! evaluated in a fixed order where the first matching rule wins. Two rules
//! only apply to the Bedrock backend.

use chatrelay_types::error::{
    ClassifiedError, ErrorKind, MAX_ERROR_MESSAGE_LENGTH, truncate_chars,
};
use chatrelay_types::llm::{LlmError, ProviderType};

/// Classifies provider failures for one backend.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    backend: ProviderType,
    credential_name: String,
}

impl ErrorClassifier {
    pub fn new(backend: ProviderType, credential_name: impl Into<String>) -> Self {
        Self {
            backend,
            credential_name: credential_name.into(),
        }
    }

    pub fn backend(&self) -> ProviderType {
        self.backend
    }

    /// Classify a provider error.
    pub fn classify(&self, err: &LlmError) -> ClassifiedError {
        self.classify_message(&err.to_string(), err.provider_message())
    }

    /// Classify raw error text. `provider_message` is the provider's own
    /// message field, when one was returned.
    pub fn classify_message(&self, raw: &str, provider_message: Option<&str>) -> ClassifiedError {
        let lower = raw.to_lowercase();
        let has = |needle: &str| lower.contains(needle);
        let bedrock = self.backend == ProviderType::Bedrock;
        let name = self.backend.display_name();

        if has("credit balance is too low") || has("insufficient credits") {
            let message = match self.backend {
                ProviderType::Anthropic => "Your Anthropic API credit balance is too low. \
                     Please add credits at https://console.anthropic.com/settings/billing"
                    .to_string(),
                ProviderType::Bedrock => "Your AWS account has insufficient credits for Bedrock. \
                     Please check billing in the AWS console."
                    .to_string(),
            };
            return ClassifiedError::new(ErrorKind::InsufficientCredits, message, false);
        }

        if has("rate limit")
            || has("too many requests")
            || (bedrock && (has("throttling") || has("rate")))
        {
            let message = match self.backend {
                ProviderType::Anthropic => "Rate limit reached. Please wait a moment and try again. \
                     If this persists, check your Anthropic account limits.",
                ProviderType::Bedrock => "Rate limit reached. Please wait a moment and try again.",
            };
            return ClassifiedError::new(ErrorKind::RateLimit, message, true);
        }

        if has("api key") && (has("invalid") || has("unauthorized")) {
            return ClassifiedError::new(
                ErrorKind::InvalidApiKey,
                format!(
                    "API key is invalid or missing. Please check your {name} API key configuration. \
                     The key should be stored in the secret '{}'",
                    self.credential_name
                ),
                false,
            );
        }

        if has("authentication") || has("unauthorized") {
            return ClassifiedError::new(
                ErrorKind::InvalidApiKey,
                format!(
                    "Authentication failed. Please verify your {name} API key is valid and has not expired."
                ),
                false,
            );
        }

        if bedrock && (has("access") || has("denied") || has("authorized")) {
            return ClassifiedError::new(
                ErrorKind::InvalidApiKey,
                "Access denied to AWS Bedrock. Please ensure the service has proper IAM permissions.",
                false,
            );
        }

        if bedrock && has("model") && has("not found") {
            return ClassifiedError::new(
                ErrorKind::SystemError,
                "Claude model not available in Bedrock. Please enable Claude models in your AWS account.",
                false,
            );
        }

        let message = match (provider_message, self.backend) {
            (Some(msg), _) => format!(
                "{name} API error: {}",
                truncate_chars(msg, MAX_ERROR_MESSAGE_LENGTH)
            ),
            (None, ProviderType::Anthropic) => format!(
                "An error occurred with the AI service: {}",
                truncate_chars(raw, MAX_ERROR_MESSAGE_LENGTH)
            ),
            (None, ProviderType::Bedrock) => format!(
                "AI service error: {}",
                truncate_chars(raw, MAX_ERROR_MESSAGE_LENGTH)
            ),
        };
        ClassifiedError::new(ErrorKind::AnthropicError, message, true)
    }
}
