//! Conversation history store trait definition.

use chatrelay_types::chat::ConversationTurn;
use chatrelay_types::error::RepositoryError;
use chrono::{DateTime, Utc};

/// Storage interface for conversation turns.
///
/// Turns are partitioned by conversation id and sorted by timestamp.
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait HistoryStore: Send + Sync {
    /// Return up to `limit` unexpired turns of a conversation, oldest first.
    fn query_turns(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationTurn>, RepositoryError>> + Send;

    /// Persist a turn. Writing a turn whose `(conversation_id, timestamp,
    /// sender)` already exists leaves the stored turn untouched.
    fn put_turn(
        &self,
        turn: &ConversationTurn,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete every turn that expired at or before `now`. Returns the count.
    fn purge_expired(
        &self,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
