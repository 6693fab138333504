use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;

/// Maximum number of characters of raw provider text echoed back to callers.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 200;

/// Machine-readable failure category surfaced as `errorType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientCredits,
    RateLimit,
    InvalidApiKey,
    /// Generic backend failure.
    AnthropicError,
    /// Validation, configuration, or unclassified failure.
    SystemError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InsufficientCredits => write!(f, "insufficient_credits"),
            ErrorKind::RateLimit => write!(f, "rate_limit"),
            ErrorKind::InvalidApiKey => write!(f, "invalid_api_key"),
            ErrorKind::AnthropicError => write!(f, "anthropic_error"),
            ErrorKind::SystemError => write!(f, "system_error"),
        }
    }
}

const GENERIC_FAILURE_MESSAGE: &str = "I'm having trouble processing your request. \
     This might be a temporary issue. Please try again in a moment.";

const CREDENTIAL_TERMS: &[&str] = &["api key", "ssm", "parameter", "secret", "credential"];

/// A failure normalized into the shared taxonomy.
///
/// This is the only error shape that reaches callers. It is built once per
/// failure and consumed by the response formatter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClassifiedError {
    /// User-facing message.
    pub message: String,
    pub kind: ErrorKind,
    pub can_retry: bool,
}

impl ClassifiedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, can_retry: bool) -> Self {
        Self {
            message: message.into(),
            kind,
            can_retry,
        }
    }

    /// A rejected request. Never retryable.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SystemError, message, false)
    }

    /// An internal failure outside the backend call itself.
    pub fn system(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SystemError, message, true)
    }

    /// The backend credential could not be read or is not configured.
    pub fn credential(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidApiKey, message, false)
    }

    /// Final pass applied to every error leaving the handler with a 500.
    ///
    /// A `system_error` that does not name the backend is either a
    /// credential problem (rewritten to `invalid_api_key`, not retryable) or
    /// an opaque internal failure (replaced with a generic retryable message).
    pub fn finalize(self) -> Self {
        if self.kind != ErrorKind::SystemError {
            return self;
        }
        let lower = self.message.to_lowercase();
        let unquoted = strip_quoted(&lower);
        if unquoted.contains("anthropic") || unquoted.contains("bedrock") {
            return self;
        }
        if CREDENTIAL_TERMS.iter().any(|term| lower.contains(term)) {
            Self::new(ErrorKind::InvalidApiKey, self.message, false)
        } else {
            Self::new(ErrorKind::SystemError, GENERIC_FAILURE_MESSAGE, true)
        }
    }
}

/// Drop single-quoted segments such as secret names from `text`.
fn strip_quoted(text: &str) -> String {
    text.split('\'').step_by(2).collect()
}

/// Truncate `text` to at most `max` characters, respecting char boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Errors related to secret operations.
#[derive(Debug, Error)]
pub enum SecretError {
    #[error("secret not found")]
    NotFound,

    #[error("secret provider unavailable")]
    ProviderUnavailable,

    #[error("secret provider is read-only")]
    ReadOnly,

    #[error("encryption error")]
    EncryptionError,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors from repository operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}
