//! In-memory port implementations shared by the unit tests of this crate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chatrelay_types::chat::{ConversationTurn, MessageRole};
use chatrelay_types::error::{ClassifiedError, RepositoryError};
use chatrelay_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, ProviderType, StopReason, Usage,
};
use chrono::{DateTime, Utc};

use crate::llm::backend::{BackendFactory, ChatBackend};
use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::classify::ErrorClassifier;
use crate::llm::provider::LlmProvider;
use crate::repository::history::HistoryStore;

/// History store backed by a shared vector. Clones share the same turns.
#[derive(Clone, Default)]
pub struct MemoryHistoryStore {
    turns: Arc<Mutex<Vec<ConversationTurn>>>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, conversation_id: &str, timestamp: &str, sender: MessageRole, message: &str) {
        let turn = ConversationTurn::new(conversation_id, timestamp, sender, message, Utc::now());
        self.turns.lock().unwrap().push(turn);
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.lock().unwrap().clone()
    }
}

impl HistoryStore for MemoryHistoryStore {
    async fn query_turns(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let mut turns: Vec<ConversationTurn> = self
            .turns
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.conversation_id == conversation_id)
            .cloned()
            .collect();
        turns.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        turns.truncate(limit as usize);
        Ok(turns)
    }

    async fn put_turn(&self, turn: &ConversationTurn) -> Result<(), RepositoryError> {
        let mut turns = self.turns.lock().unwrap();
        let exists = turns.iter().any(|t| {
            t.conversation_id == turn.conversation_id
                && t.timestamp == turn.timestamp
                && t.sender == turn.sender
        });
        if !exists {
            turns.push(turn.clone());
        }
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let mut turns = self.turns.lock().unwrap();
        let before = turns.len();
        turns.retain(|t| !t.is_expired(now));
        Ok((before - turns.len()) as u64)
    }
}

/// History store whose every operation fails.
pub struct FailingHistoryStore;

impl HistoryStore for FailingHistoryStore {
    async fn query_turns(
        &self,
        _conversation_id: &str,
        _limit: u32,
    ) -> Result<Vec<ConversationTurn>, RepositoryError> {
        Err(RepositoryError::Connection)
    }

    async fn put_turn(&self, _turn: &ConversationTurn) -> Result<(), RepositoryError> {
        Err(RepositoryError::Query("disk I/O error".to_string()))
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        Err(RepositoryError::Connection)
    }
}

type Outcome = Arc<dyn Fn() -> Result<String, LlmError> + Send + Sync>;

/// Provider that records requests and answers from a fixed script.
#[derive(Clone)]
pub struct ScriptedProvider {
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    outcome: Outcome,
}

impl ScriptedProvider {
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self {
            requests: Arc::default(),
            outcome: Arc::new(move || Ok(text.clone())),
        }
    }

    pub fn failing(make_error: impl Fn() -> LlmError + Send + Sync + 'static) -> Self {
        Self {
            requests: Arc::default(),
            outcome: Arc::new(move || Err(make_error())),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let content = (self.outcome)()?;
        Ok(CompletionResponse {
            id: "msg_test".to_string(),
            content,
            model: request.model.clone(),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }
}

/// Factory that wraps a [`ScriptedProvider`], or always fails.
pub struct StaticBackendFactory {
    provider: ScriptedProvider,
    backend: ProviderType,
    failure: Option<ClassifiedError>,
    builds: Arc<AtomicUsize>,
}

impl StaticBackendFactory {
    pub fn new(provider: ScriptedProvider) -> Self {
        Self::with_backend(provider, ProviderType::Anthropic)
    }

    pub fn with_backend(provider: ScriptedProvider, backend: ProviderType) -> Self {
        Self {
            provider,
            backend,
            failure: None,
            builds: Arc::default(),
        }
    }

    pub fn failing(err: ClassifiedError) -> Self {
        Self {
            provider: ScriptedProvider::replying(""),
            backend: ProviderType::Anthropic,
            failure: Some(err),
            builds: Arc::default(),
        }
    }

    pub fn build_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.builds)
    }
}

impl BackendFactory for StaticBackendFactory {
    async fn build(&self) -> Result<ChatBackend, ClassifiedError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        Ok(ChatBackend::new(
            BoxLlmProvider::new(self.provider.clone()),
            ErrorClassifier::new(self.backend, "ANTHROPIC_API_KEY"),
            "claude-3-haiku-20240307",
            2048,
        ))
    }
}
