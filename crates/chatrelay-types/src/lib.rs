//! Shared domain types for chatrelay.
//!
//! This crate contains the types used across the workspace: conversation
//! turns, chat requests/responses, the HTTP gateway envelope, LLM
//! request/response shapes, service configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod llm;
