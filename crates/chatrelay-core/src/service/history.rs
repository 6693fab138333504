//! Conversation history assembly and best-effort persistence.
//!
//! Storage failures never abort a chat request: reads degrade to an empty
//! history and writes are logged and dropped.

use chatrelay_types::chat::{ConversationTurn, MessageRole};
use chatrelay_types::error::RepositoryError;
use chatrelay_types::llm::Message;
use chrono::Utc;
use tracing::{debug, warn};

use crate::repository::history::HistoryStore;

/// Loads and appends conversation turns through a [`HistoryStore`].
pub struct HistoryService<H: HistoryStore> {
    store: H,
}

impl<H: HistoryStore> HistoryService<H> {
    pub fn new(store: H) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &H {
        &self.store
    }

    /// Assemble the prior messages of a conversation, oldest first.
    ///
    /// `limit` counts exchanges, so up to `2 * limit` turns are fetched.
    /// The query returns the oldest turns of the conversation, not the most
    /// recent ones. Any store failure yields an empty history.
    pub async fn load_history(&self, conversation_id: &str, limit: u32) -> Vec<Message> {
        match self
            .store
            .query_turns(conversation_id, limit.saturating_mul(2))
            .await
        {
            Ok(turns) => {
                let messages: Vec<Message> = turns
                    .into_iter()
                    .map(|turn| Message {
                        role: turn.sender,
                        content: turn.message,
                    })
                    .collect();
                debug!(
                    conversation_id,
                    message_count = messages.len(),
                    "Retrieved conversation history"
                );
                messages
            }
            Err(e) => {
                warn!(conversation_id, error = %e, "Failed to load conversation history");
                Vec::new()
            }
        }
    }

    /// Persist one turn. Failures are logged and swallowed.
    pub async fn append_turn(
        &self,
        conversation_id: &str,
        sender: MessageRole,
        message: &str,
        timestamp: &str,
    ) {
        let turn = ConversationTurn::new(conversation_id, timestamp, sender, message, Utc::now());
        match self.store.put_turn(&turn).await {
            Ok(()) => debug!(conversation_id, %sender, "Stored conversation turn"),
            Err(e) => warn!(conversation_id, %sender, error = %e, "Failed to store conversation turn"),
        }
    }

    /// Remove expired turns from the store.
    pub async fn purge_expired(&self) -> Result<u64, RepositoryError> {
        self.store.purge_expired(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingHistoryStore, MemoryHistoryStore};

    #[tokio::test]
    async fn test_load_history_maps_senders_to_roles() {
        let store = MemoryHistoryStore::new();
        store.seed("c1", "2024-01-01T00:00:00Z", MessageRole::User, "hi");
        store.seed("c1", "2024-01-01T00:00:00Z", MessageRole::Assistant, "hello");
        store.seed("c2", "2024-01-01T00:00:00Z", MessageRole::User, "other");

        let service = HistoryService::new(store);
        let history = service.load_history("c1", 10).await;

        assert_eq!(
            history,
            vec![Message::user("hi"), Message::assistant("hello")]
        );
    }

    #[tokio::test]
    async fn test_load_history_requests_twice_the_limit() {
        let store = MemoryHistoryStore::new();
        for i in 0..30 {
            store.seed("c1", &format!("2024-01-01T00:00:{i:02}Z"), MessageRole::User, &i.to_string());
        }

        let service = HistoryService::new(store);
        let history = service.load_history("c1", 10).await;

        assert_eq!(history.len(), 20);
        assert_eq!(history[0].content, "0");
        assert_eq!(history[19].content, "19");
    }

    #[tokio::test]
    async fn test_load_history_store_failure_is_empty() {
        let service = HistoryService::new(FailingHistoryStore);
        assert!(service.load_history("c1", 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_append_turn_sets_expiry() {
        let service = HistoryService::new(MemoryHistoryStore::new());
        service
            .append_turn("c1", MessageRole::User, "hi", "2024-01-01T00:00:00Z")
            .await;

        let turns = service.store().turns();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].sender, MessageRole::User);
        assert!(turns[0].expires_at > Utc::now().timestamp());
    }

    #[tokio::test]
    async fn test_append_turn_swallows_store_failure() {
        let service = HistoryService::new(FailingHistoryStore);
        service
            .append_turn("c1", MessageRole::Assistant, "hi", "2024-01-01T00:00:00Z")
            .await;
    }
}
