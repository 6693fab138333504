//! LlmProvider trait definition.
//!
//! This is the core abstraction that both chat backends implement.

use chatrelay_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for LLM provider backends (Bedrock, Anthropic).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in chatrelay-infra (e.g., `AnthropicProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic", "bedrock").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
