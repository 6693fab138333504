//! Secret chain builder -- wires concrete providers in priority order.
//!
//! The resulting chain is passed to `SecretService` in `chatrelay-core`
//! via the `DynSecretProvider` abstraction.
//!
//! Default chain order: `[EnvSecretProvider, VaultSecretProvider]`

use std::sync::Arc;

use chatrelay_core::repository::secret::DynSecretProvider;

use crate::secret::VaultSecretProvider;
use crate::secret::env::EnvSecretProvider;

/// Build the secret resolution chain. First match wins:
/// 1. Environment variables (if `include_env` is true)
/// 2. Encrypted vault (always included)
pub fn build_secret_chain(vault: VaultSecretProvider, include_env: bool) -> Vec<DynSecretProvider> {
    let mut chain: Vec<DynSecretProvider> = Vec::new();

    if include_env {
        chain.push(Arc::new(EnvSecretProvider::new()));
    }
    chain.push(Arc::new(vault));

    chain
}
