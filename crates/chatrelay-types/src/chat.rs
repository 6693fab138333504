//! Conversation turn and chat request/response types for chatrelay.
//!
//! A conversation is an ordered list of turns keyed by `conversation_id`.
//! Each successful exchange appends exactly two turns (user, assistant)
//! that share the same timestamp.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub use crate::llm::MessageRole;

/// Default number of exchanges loaded as history for a request.
pub const HISTORY_LIMIT: u32 = 10;

/// Days a stored turn lives before it expires.
pub const TURN_TTL_DAYS: i64 = 30;

/// A single persisted message in a conversation.
///
/// Turns are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub conversation_id: String,
    /// ISO-8601 timestamp shared by both turns of one exchange.
    pub timestamp: String,
    pub sender: MessageRole,
    pub message: String,
    /// Epoch seconds after which the turn is no longer returned.
    pub expires_at: i64,
}

impl ConversationTurn {
    /// Build a turn whose expiry is [`TURN_TTL_DAYS`] after `created`.
    pub fn new(
        conversation_id: impl Into<String>,
        timestamp: impl Into<String>,
        sender: MessageRole,
        message: impl Into<String>,
        created: DateTime<Utc>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            timestamp: timestamp.into(),
            sender,
            message: message.into(),
            expires_at: (created + Duration::days(TURN_TTL_DAYS)).timestamp(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }
}

/// A validated inbound chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The user's message, already trimmed and non-empty.
    pub message: String,
    pub conversation_id: String,
}

/// Body of a successful chat response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub conversation_id: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
