//! LLM provider abstractions for chatrelay.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `ErrorClassifier`: maps provider failures onto the error taxonomy
//! - `ChatBackend` / `LazyBackend`: the configured backend and its lazy holder

pub mod backend;
pub mod box_provider;
pub mod classify;
pub mod provider;
