//! AWS Bedrock LLM provider implementation.
//!
//! Implements [`LlmProvider`](chatrelay_core::llm::provider::LlmProvider)
//! for the AWS Bedrock Runtime `invoke` API using Bearer token authentication.

mod client;
pub mod types;

pub use client::BedrockProvider;
