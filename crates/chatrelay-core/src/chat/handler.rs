//! The chat request handler.
//!
//! One invocation: validate, load history, call the backend, persist both
//! turns best-effort, and wrap the outcome in a gateway response. The
//! handler holds no per-request state; the lazily-built backend is the only
//! thing shared between requests.

use chatrelay_types::chat::{ChatRequest, ChatResponse, MessageRole};
use chatrelay_types::error::ClassifiedError;
use chatrelay_types::gateway::{GatewayEvent, GatewayResponse};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::response;
use super::validate::validate;
use crate::llm::backend::{BackendFactory, LazyBackend};
use crate::repository::history::HistoryStore;
use crate::service::history::HistoryService;

/// Handles chat events end to end.
///
/// Generic over the history store and backend factory to keep
/// chatrelay-core free of infrastructure dependencies.
pub struct ChatHandler<H: HistoryStore, F: BackendFactory> {
    history: HistoryService<H>,
    backend: LazyBackend<F>,
    history_limit: u32,
}

impl<H: HistoryStore, F: BackendFactory> ChatHandler<H, F> {
    pub fn new(history: HistoryService<H>, backend: LazyBackend<F>, history_limit: u32) -> Self {
        Self {
            history,
            backend,
            history_limit,
        }
    }

    /// Access the history service.
    pub fn history(&self) -> &HistoryService<H> {
        &self.history
    }

    pub fn history_limit(&self) -> u32 {
        self.history_limit
    }

    /// Whether the backend has been constructed yet.
    pub fn backend_ready(&self) -> bool {
        self.backend.is_initialized()
    }

    /// Handle one event. Never fails: every outcome is a response.
    pub async fn handle(&self, event: &GatewayEvent) -> GatewayResponse {
        let request_id = Uuid::new_v4().to_string();

        if event.is_preflight() {
            debug!(request_id, "Answering CORS preflight");
            return response::preflight();
        }

        let request = match validate(event) {
            Ok(request) => request,
            Err(err) => {
                warn!(request_id, error = %err, "Rejected chat request");
                return response::error(400, &err);
            }
        };

        info!(
            request_id,
            conversation_id = %request.conversation_id,
            "Processing chat message"
        );

        match self.process(&request, &request_id).await {
            Ok(body) => {
                info!(request_id, "Chat request completed");
                response::success(&body)
            }
            Err(err) => {
                let err = err.finalize();
                error!(
                    request_id,
                    conversation_id = %request.conversation_id,
                    error_type = %err.kind,
                    can_retry = err.can_retry,
                    error = %err,
                    "Chat request failed"
                );
                response::error_with_details(500, &err, json!({ "requestId": request_id }))
            }
        }
    }

    async fn process(
        &self,
        request: &ChatRequest,
        request_id: &str,
    ) -> Result<ChatResponse, ClassifiedError> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let conversation_id = request.conversation_id.as_str();

        let history = self
            .history
            .load_history(conversation_id, self.history_limit)
            .await;

        let backend = self.backend.get().await?;
        let reply = backend.generate(history, &request.message).await?;

        self.history
            .append_turn(conversation_id, MessageRole::User, &request.message, &timestamp)
            .await;
        self.history
            .append_turn(conversation_id, MessageRole::Assistant, &reply, &timestamp)
            .await;

        Ok(ChatResponse {
            response: reply,
            conversation_id: request.conversation_id.clone(),
            timestamp,
            request_id: Some(request_id.to_string()),
        })
    }
}
