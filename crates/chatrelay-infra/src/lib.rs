//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the traits defined in `chatrelay-core`:
//! SQLite conversation storage, the encrypted secret vault, and the
//! Anthropic and Bedrock HTTP providers.

pub mod backend;
pub mod config;
pub mod crypto;
pub mod llm;
pub mod secret;
pub mod sqlite;
