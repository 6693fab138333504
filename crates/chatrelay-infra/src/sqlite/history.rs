//! SQLite conversation history store.
//!
//! Implements `HistoryStore` from `chatrelay-core` using sqlx with split
//! read/write pools. Expired turns are filtered out of every read and
//! physically removed by `purge_expired`.

use chatrelay_core::repository::history::HistoryStore;
use chatrelay_types::chat::{ConversationTurn, MessageRole};
use chatrelay_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryStore`.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: DatabasePool,
}

impl SqliteHistoryStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain ConversationTurn.
struct TurnRow {
    conversation_id: String,
    timestamp: String,
    sender: String,
    message: String,
    expires_at: i64,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            conversation_id: row.try_get("conversation_id")?,
            timestamp: row.try_get("timestamp")?,
            sender: row.try_get("sender")?,
            message: row.try_get("message")?,
            expires_at: row.try_get("expires_at")?,
        })
    }

    fn into_turn(self) -> ConversationTurn {
        ConversationTurn {
            conversation_id: self.conversation_id,
            timestamp: self.timestamp,
            sender: MessageRole::from_sender(&self.sender),
            message: self.message,
            expires_at: self.expires_at,
        }
    }
}

impl HistoryStore for SqliteHistoryStore {
    async fn query_turns(
        &self,
        conversation_id: &str,
        limit: u32,
    ) -> Result<Vec<ConversationTurn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT conversation_id, timestamp, sender, message, expires_at
             FROM conversation_turns
             WHERE conversation_id = ? AND expires_at > ?
             ORDER BY timestamp ASC, seq ASC
             LIMIT ?",
        )
        .bind(conversation_id)
        .bind(Utc::now().timestamp())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                TurnRow::from_row(row)
                    .map(TurnRow::into_turn)
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            })
            .collect()
    }

    async fn put_turn(&self, turn: &ConversationTurn) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT OR IGNORE INTO conversation_turns
                 (conversation_id, timestamp, sender, message, expires_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&turn.conversation_id)
        .bind(&turn.timestamp)
        .bind(turn.sender.to_string())
        .bind(&turn.message)
        .bind(turn.expires_at)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM conversation_turns WHERE expires_at <= ?")
            .bind(now.timestamp())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;
    use chrono::Duration;

    async fn test_store() -> (SqliteHistoryStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url(dir.path(), "history"))
            .await
            .unwrap();
        (SqliteHistoryStore::new(pool), dir)
    }

    fn turn(conv: &str, ts: &str, sender: MessageRole, message: &str) -> ConversationTurn {
        ConversationTurn::new(conv, ts, sender, message, Utc::now())
    }

    #[tokio::test]
    async fn test_put_and_query_in_timestamp_order() {
        let (store, _dir) = test_store().await;

        store
            .put_turn(&turn("c1", "2024-01-02T00:00:00.000000Z", MessageRole::User, "second"))
            .await
            .unwrap();
        store
            .put_turn(&turn("c1", "2024-01-01T00:00:00.000000Z", MessageRole::User, "first"))
            .await
            .unwrap();
        store
            .put_turn(&turn("c2", "2024-01-01T00:00:00.000000Z", MessageRole::User, "other"))
            .await
            .unwrap();

        let turns = store.query_turns("c1", 20).await.unwrap();
        let messages: Vec<&str> = turns.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_shared_timestamp_keeps_user_before_assistant() {
        let (store, _dir) = test_store().await;
        let ts = "2024-01-01T00:00:00.000000Z";

        store.put_turn(&turn("c1", ts, MessageRole::User, "q")).await.unwrap();
        store.put_turn(&turn("c1", ts, MessageRole::Assistant, "a")).await.unwrap();

        let turns = store.query_turns("c1", 20).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].sender, MessageRole::User);
        assert_eq!(turns[1].sender, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_put_is_insert_or_ignore() {
        let (store, _dir) = test_store().await;
        let ts = "2024-01-01T00:00:00.000000Z";

        store.put_turn(&turn("c1", ts, MessageRole::User, "first write")).await.unwrap();
        store.put_turn(&turn("c1", ts, MessageRole::User, "rewrite")).await.unwrap();

        let turns = store.query_turns("c1", 20).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].message, "first write");
    }

    #[tokio::test]
    async fn test_query_respects_limit_from_oldest() {
        let (store, _dir) = test_store().await;
        for i in 0..5 {
            let ts = format!("2024-01-01T00:00:0{i}.000000Z");
            store
                .put_turn(&turn("c1", &ts, MessageRole::User, &i.to_string()))
                .await
                .unwrap();
        }

        let turns = store.query_turns("c1", 3).await.unwrap();
        let messages: Vec<&str> = turns.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["0", "1", "2"]);
    }

    #[tokio::test]
    async fn test_expired_turns_hidden_and_purged() {
        let (store, _dir) = test_store().await;
        let old = ConversationTurn::new(
            "c1",
            "2020-01-01T00:00:00.000000Z",
            MessageRole::User,
            "stale",
            Utc::now() - Duration::days(31),
        );
        store.put_turn(&old).await.unwrap();
        store
            .put_turn(&turn("c1", "2024-01-01T00:00:00.000000Z", MessageRole::User, "fresh"))
            .await
            .unwrap();

        let turns = store.query_turns("c1", 20).await.unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].message, "fresh");

        assert_eq!(store.purge_expired(Utc::now()).await.unwrap(), 1);
        assert_eq!(store.purge_expired(Utc::now()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_sender_reads_as_assistant() {
        let (store, _dir) = test_store().await;
        sqlx::query(
            "INSERT INTO conversation_turns (conversation_id, timestamp, sender, message, expires_at)
             VALUES ('c1', '2024-01-01T00:00:00Z', 'bot', 'legacy', ?)",
        )
        .bind(Utc::now().timestamp() + 3600)
        .execute(&store.pool.writer)
        .await
        .unwrap();

        let turns = store.query_turns("c1", 20).await.unwrap();
        assert_eq!(turns[0].sender, MessageRole::Assistant);
    }
}
