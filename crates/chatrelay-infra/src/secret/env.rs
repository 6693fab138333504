//! Environment variable secret provider.
//!
//! A read-only secret provider that checks environment variables.
//! Env vars override the vault.
//!
//! Key resolution:
//! - checks `key` directly (e.g., "ANTHROPIC_API_KEY")
//! - then the key normalized to an env var name, so a parameter-style name
//!   such as `/prod/anthropic-api-key` resolves from `PROD_ANTHROPIC_API_KEY`

use chatrelay_core::repository::secret::SecretProvider;
use chatrelay_types::error::SecretError;

/// Environment variable secret provider.
///
/// Read-only: `set()` returns [`SecretError::ReadOnly`].
pub struct EnvSecretProvider {
    lookup: fn(&str) -> Option<String>,
}

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }

    /// Resolve from a custom lookup instead of the process environment.
    pub fn with_lookup(lookup: fn(&str) -> Option<String>) -> Self {
        Self { lookup }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Map an arbitrary secret name onto the env var naming convention.
pub fn env_var_name(key: &str) -> String {
    key.trim_start_matches('/')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

impl SecretProvider for EnvSecretProvider {
    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        if let Some(value) = (self.lookup)(key) {
            return Ok(Some(value));
        }

        let normalized = env_var_name(key);
        if normalized != key {
            return Ok((self.lookup)(&normalized));
        }
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), SecretError> {
        Err(SecretError::ReadOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env(name: &str) -> Option<String> {
        match name {
            "ANTHROPIC_API_KEY" => Some("sk-direct".to_string()),
            "PROD_ANTHROPIC_API_KEY" => Some("sk-normalized".to_string()),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_env_provider_get_direct() {
        let provider = EnvSecretProvider::with_lookup(fake_env);
        assert_eq!(
            provider.get("ANTHROPIC_API_KEY").await.unwrap(),
            Some("sk-direct".to_string())
        );
    }

    #[tokio::test]
    async fn test_env_provider_get_normalized() {
        let provider = EnvSecretProvider::with_lookup(fake_env);
        assert_eq!(
            provider.get("/prod/anthropic-api-key").await.unwrap(),
            Some("sk-normalized".to_string())
        );
    }

    #[tokio::test]
    async fn test_env_provider_get_missing() {
        let provider = EnvSecretProvider::new();
        assert!(provider.get("NONEXISTENT_VAR_XYZ_123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_env_provider_set_is_read_only() {
        let provider = EnvSecretProvider::new();
        assert!(matches!(
            provider.set("KEY", "value").await,
            Err(SecretError::ReadOnly)
        ));
    }

    #[test]
    fn test_env_var_name() {
        assert_eq!(env_var_name("/prod/anthropic-api-key"), "PROD_ANTHROPIC_API_KEY");
        assert_eq!(env_var_name("ANTHROPIC_API_KEY"), "ANTHROPIC_API_KEY");
    }
}
