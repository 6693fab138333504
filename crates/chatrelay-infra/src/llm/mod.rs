//! LLM provider implementations.
//!
//! Contains the concrete implementations of the [`LlmProvider`] trait
//! defined in `chatrelay-core` for the two supported backends, and the
//! factory ([`create_provider`]) that picks one from a [`ServiceConfig`].
//!
//! [`LlmProvider`]: chatrelay_core::llm::provider::LlmProvider

pub mod anthropic;
pub mod bedrock;

use secrecy::SecretString;

use chatrelay_core::llm::box_provider::BoxLlmProvider;
use chatrelay_types::config::ServiceConfig;
use chatrelay_types::llm::{LlmError, ProviderType};

use self::anthropic::AnthropicProvider;
use self::bedrock::BedrockProvider;

/// Create a [`BoxLlmProvider`] for the configured backend.
///
/// `api_key` is the already-resolved credential value.
pub fn create_provider(config: &ServiceConfig, api_key: &str) -> Result<BoxLlmProvider, LlmError> {
    let secret = SecretString::from(api_key.to_string());

    match config.backend {
        ProviderType::Anthropic => {
            let mut provider = AnthropicProvider::new(secret, config.model().to_string())?;
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            Ok(BoxLlmProvider::new(provider))
        }
        ProviderType::Bedrock => {
            let mut provider =
                BedrockProvider::new(secret, config.model().to_string(), config.region.clone())?;
            if let Some(endpoint) = &config.base_url {
                provider = provider.with_endpoint(endpoint.clone());
            }
            Ok(BoxLlmProvider::new(provider))
        }
    }
}
