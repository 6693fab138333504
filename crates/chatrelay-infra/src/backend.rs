//! Backend factory that resolves the credential and builds the configured provider.

use std::sync::Arc;

use chatrelay_core::llm::backend::{BackendFactory, ChatBackend};
use chatrelay_core::llm::classify::ErrorClassifier;
use chatrelay_core::service::secret::SecretService;
use chatrelay_types::config::ServiceConfig;
use chatrelay_types::error::ClassifiedError;
use chatrelay_types::llm::MAX_OUTPUT_TOKENS;

use crate::llm::create_provider;

/// Builds a [`ChatBackend`] from the service config on first use.
///
/// The credential is read through the secret chain at build time, so a key
/// stored after startup is picked up by the first request that needs it.
pub struct ConfiguredBackendFactory {
    config: ServiceConfig,
    secrets: Arc<SecretService>,
}

impl ConfiguredBackendFactory {
    pub fn new(config: ServiceConfig, secrets: Arc<SecretService>) -> Self {
        Self { config, secrets }
    }
}

impl BackendFactory for ConfiguredBackendFactory {
    async fn build(&self) -> Result<ChatBackend, ClassifiedError> {
        let credential = self.config.credential_name();

        let api_key = self
            .secrets
            .get_secret(credential)
            .await
            .map_err(|e| {
                ClassifiedError::credential(format!("Failed to read secret '{credential}': {e}"))
            })?
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                ClassifiedError::credential(format!(
                    "API key not found: secret '{credential}' is not set in the environment or the vault"
                ))
            })?;

        let provider = create_provider(&self.config, api_key.trim()).map_err(|e| {
            ClassifiedError::system(format!(
                "Failed to initialize {} client: {e}",
                self.config.backend.display_name()
            ))
        })?;

        tracing::info!(
            backend = %self.config.backend,
            model = self.config.model(),
            "Initialized chat backend"
        );

        Ok(ChatBackend::new(
            provider,
            ErrorClassifier::new(self.config.backend, credential),
            self.config.model(),
            MAX_OUTPUT_TOKENS,
        ))
    }
}
