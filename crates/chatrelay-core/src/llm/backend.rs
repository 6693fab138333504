//! The chat backend: one provider, one classifier, fixed request shape.

use chatrelay_types::error::ClassifiedError;
use chatrelay_types::llm::{CompletionRequest, Message};
use tokio::sync::OnceCell;
use tracing::{Instrument, debug, info, info_span, warn};

use super::box_provider::BoxLlmProvider;
use super::classify::ErrorClassifier;

/// System instruction sent with every completion.
pub const SYSTEM_PROMPT: &str = "You are an expert AWS developer assistant. Help users with:
- Writing AWS Lambda functions (Python, Node.js)
- Creating SAM and CloudFormation templates
- AWS SDK code (boto3, AWS SDK for JavaScript)
- Deployment troubleshooting
- Cost optimization
- Best practices for AWS services

Provide complete, working code examples. Be concise but thorough.";

/// A configured LLM backend.
///
/// Every failure leaving [`ChatBackend::generate`] has already been
/// classified.
pub struct ChatBackend {
    provider: BoxLlmProvider,
    classifier: ErrorClassifier,
    model: String,
    max_tokens: u32,
}

impl ChatBackend {
    pub fn new(
        provider: BoxLlmProvider,
        classifier: ErrorClassifier,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            provider,
            classifier,
            model: model.into(),
            max_tokens,
        }
    }

    pub fn name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Produce the assistant reply to `user_message` given prior `history`.
    pub async fn generate(
        &self,
        history: Vec<Message>,
        user_message: &str,
    ) -> Result<String, ClassifiedError> {
        let mut messages = history;
        messages.push(Message::user(user_message));

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            system: Some(SYSTEM_PROMPT.to_string()),
            max_tokens: self.max_tokens,
        };

        info!(
            backend = self.provider.name(),
            message_count = request.messages.len(),
            "Calling LLM backend"
        );

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
        );

        match self.provider.complete(&request).instrument(span).await {
            Ok(response) => {
                debug!(
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    stop_reason = %response.stop_reason,
                    response_chars = response.content.chars().count(),
                    "Generated response"
                );
                Ok(response.content)
            }
            Err(e) => {
                let classified = self.classifier.classify(&e);
                warn!(
                    backend = self.provider.name(),
                    error = %e,
                    error_type = %classified.kind,
                    "LLM backend call failed"
                );
                Err(classified)
            }
        }
    }
}

/// Builds a [`ChatBackend`], typically by resolving a credential and
/// constructing the configured provider.
pub trait BackendFactory: Send + Sync {
    fn build(
        &self,
    ) -> impl std::future::Future<Output = Result<ChatBackend, ClassifiedError>> + Send;
}

/// A backend constructed on first use and reused afterwards.
///
/// Concurrent first calls wait on a single construction. A failed
/// construction is not cached; the next call tries again.
pub struct LazyBackend<F: BackendFactory> {
    factory: F,
    cell: OnceCell<ChatBackend>,
}

impl<F: BackendFactory> LazyBackend<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    pub async fn get(&self) -> Result<&ChatBackend, ClassifiedError> {
        self.cell
            .get_or_try_init(|| async {
                let backend = self.factory.build().await?;
                info!(backend = backend.name(), model = backend.model(), "LLM backend initialized");
                Ok::<_, ClassifiedError>(backend)
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}
