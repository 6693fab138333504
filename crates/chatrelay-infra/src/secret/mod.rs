//! Secret provider implementations.
//!
//! - `env`: Environment variable provider (read-only, highest priority)
//! - `chain`: Secret chain builder wiring all providers together
//! - `VaultSecretProvider`: Encrypts/decrypts secrets using AES-256-GCM vault + SQLite storage

pub mod chain;
pub mod env;

use chatrelay_core::repository::secret::SecretProvider;
use chatrelay_types::error::SecretError;

use crate::crypto::vault::VaultCrypto;
use crate::sqlite::secret::SqliteSecretRepository;

/// Secret provider that encrypts values with AES-256-GCM before storing in SQLite.
///
/// Values are encrypted before storage and decrypted on retrieval.
pub struct VaultSecretProvider {
    repo: SqliteSecretRepository,
    crypto: VaultCrypto,
}

impl VaultSecretProvider {
    pub fn new(repo: SqliteSecretRepository, crypto: VaultCrypto) -> Self {
        Self { repo, crypto }
    }
}

impl SecretProvider for VaultSecretProvider {
    async fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        let encrypted = match self
            .repo
            .get_encrypted(key)
            .await
            .map_err(|e| SecretError::StorageError(e.to_string()))?
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let plaintext = self
            .crypto
            .decrypt(&encrypted)
            .map_err(|_| SecretError::EncryptionError)?;

        String::from_utf8(plaintext).map(Some).map_err(|_| {
            SecretError::StorageError("decrypted value is not valid UTF-8".to_string())
        })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let encrypted = self
            .crypto
            .encrypt(value.as_bytes())
            .map_err(|_| SecretError::EncryptionError)?;

        self.repo
            .put_encrypted(key, &encrypted)
            .await
            .map_err(|e| SecretError::StorageError(e.to_string()))
    }
}
