//! SQLite secret repository.
//!
//! Stores encrypted secret values as BLOBs. Encryption and decryption are
//! handled by the caller (`VaultSecretProvider`); this repository only moves
//! raw bytes.

use chatrelay_types::error::RepositoryError;
use chrono::Utc;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed storage for encrypted vault entries.
///
/// Never logs or exposes encrypted values.
pub struct SqliteSecretRepository {
    pool: DatabasePool,
}

impl SqliteSecretRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Fetch the encrypted bytes stored under `key`.
    pub async fn get_encrypted(&self, key: &str) -> Result<Option<Vec<u8>>, RepositoryError> {
        let row = sqlx::query("SELECT encrypted_value FROM secrets WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.map(|row| {
            row.try_get::<Vec<u8>, _>("encrypted_value")
                .map_err(|e| RepositoryError::Query(e.to_string()))
        })
        .transpose()
    }

    /// Insert or replace the encrypted bytes stored under `key`.
    pub async fn put_encrypted(&self, key: &str, encrypted: &[u8]) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO secrets (key, encrypted_value, created_at, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET encrypted_value = excluded.encrypted_value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(encrypted)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::database_url;

    async fn test_repo() -> (SqliteSecretRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url(dir.path(), "secrets"))
            .await
            .unwrap();
        (SqliteSecretRepository::new(pool), dir)
    }

    #[tokio::test]
    async fn test_put_and_get_bytes() {
        let (repo, _dir) = test_repo().await;
        repo.put_encrypted("KEY", &[1, 2, 3]).await.unwrap();
        assert_eq!(repo.get_encrypted("KEY").await.unwrap(), Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (repo, _dir) = test_repo().await;
        repo.put_encrypted("KEY", &[1]).await.unwrap();
        repo.put_encrypted("KEY", &[2]).await.unwrap();
        assert_eq!(repo.get_encrypted("KEY").await.unwrap(), Some(vec![2]));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (repo, _dir) = test_repo().await;
        assert!(repo.get_encrypted("NOPE").await.unwrap().is_none());
    }
}
