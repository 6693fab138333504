//! Secret management service.
//!
//! SecretService resolves secrets through a chain of providers in priority order.
//! Resolution precedence: env vars > encrypted vault.
//!
//! This service lives in `chatrelay-core` and depends only on `chatrelay-types`
//! and the `DynSecretProvider` abstraction -- never on concrete infra implementations.

use chatrelay_types::error::SecretError;

use crate::repository::secret::DynSecretProvider;

/// Service for resolving secrets across multiple storage backends.
///
/// Providers are ordered by precedence (first match wins).
/// Default chain: `[EnvSecretProvider, VaultSecretProvider]`
pub struct SecretService {
    providers: Vec<DynSecretProvider>,
}

impl SecretService {
    /// Create a new SecretService with the given provider chain.
    ///
    /// Providers should be ordered by precedence (highest priority first).
    pub fn new(providers: Vec<DynSecretProvider>) -> Self {
        Self { providers }
    }

    /// Resolve a secret value by iterating through providers in priority order.
    pub async fn get_secret(&self, key: &str) -> Result<Option<String>, SecretError> {
        for provider in &self.providers {
            if let Some(value) = provider.get_boxed(key).await? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    /// Store a secret value in the first writable provider.
    ///
    /// Read-only providers (e.g., env vars) are skipped.
    pub async fn set_secret(&self, key: &str, value: &str) -> Result<(), SecretError> {
        for provider in &self.providers {
            match provider.set_boxed(key, value).await {
                Ok(()) => return Ok(()),
                Err(SecretError::ReadOnly) => continue,
                Err(e) => return Err(e),
            }
        }

        Err(SecretError::ProviderUnavailable)
    }

    /// Mask a secret value, showing only the last 4 characters.
    ///
    /// - "sk-abcdefghijklmnop" -> "****mnop"
    /// - "abc" -> "****" (too short to show any chars)
    pub fn mask_secret(value: &str) -> String {
        let count = value.chars().count();
        if count <= 4 {
            "****".to_string()
        } else {
            let tail: String = value.chars().skip(count - 4).collect();
            format!("****{tail}")
        }
    }
}
