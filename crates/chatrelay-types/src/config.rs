//! Service configuration types for chatrelay.
//!
//! `ServiceConfig` represents the `config.toml` in the data directory,
//! which environment variables may override at startup.

use serde::{Deserialize, Serialize};

use crate::llm::ProviderType;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_BEDROCK_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";

pub const DEFAULT_ANTHROPIC_CREDENTIAL: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_BEDROCK_CREDENTIAL: &str = "AWS_BEARER_TOKEN_BEDROCK";

/// Top-level configuration for the chat service.
///
/// Loaded from `~/.chatrelay/config.toml`. All fields have sensible defaults.
/// The history limit and output token cap are fixed constants, not settings;
/// unknown keys in the file are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Name of the conversation store (the SQLite file stem).
    #[serde(default = "default_conversations_table")]
    pub conversations_table: String,

    /// AWS region used by the Bedrock backend.
    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default)]
    pub backend: ProviderType,

    /// Name of the secret holding the backend credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Overrides the backend endpoint (used for local gateways and tests).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_conversations_table() -> String {
    "conversations".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            conversations_table: default_conversations_table(),
            region: default_region(),
            backend: ProviderType::default(),
            credential_name: None,
            model: None,
            base_url: None,
        }
    }
}

impl ServiceConfig {
    /// The secret name for the backend credential, falling back to the
    /// backend's conventional variable name.
    pub fn credential_name(&self) -> &str {
        match (&self.credential_name, self.backend) {
            (Some(name), _) => name,
            (None, ProviderType::Anthropic) => DEFAULT_ANTHROPIC_CREDENTIAL,
            (None, ProviderType::Bedrock) => DEFAULT_BEDROCK_CREDENTIAL,
        }
    }

    /// The model identifier, falling back to the backend's Claude Haiku id.
    pub fn model(&self) -> &str {
        match (&self.model, self.backend) {
            (Some(model), _) => model,
            (None, ProviderType::Anthropic) => DEFAULT_ANTHROPIC_MODEL,
            (None, ProviderType::Bedrock) => DEFAULT_BEDROCK_MODEL,
        }
    }
}
