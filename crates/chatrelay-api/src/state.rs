//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and HTTP
//! handlers. The chat handler is generic over its store and backend factory;
//! AppState pins it to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use chatrelay_core::chat::handler::ChatHandler;
use chatrelay_core::llm::backend::LazyBackend;
use chatrelay_core::service::history::HistoryService;
use chatrelay_core::service::secret::SecretService;
use chatrelay_infra::backend::ConfiguredBackendFactory;
use chatrelay_infra::config::{load_effective_config, resolve_data_dir};
use chatrelay_infra::crypto::vault::{KEY_FILE_NAME, VaultCrypto};
use chatrelay_infra::secret::VaultSecretProvider;
use chatrelay_infra::secret::chain::build_secret_chain;
use chatrelay_infra::sqlite::history::SqliteHistoryStore;
use chatrelay_infra::sqlite::pool::{DatabasePool, database_url};
use chatrelay_infra::sqlite::secret::SqliteSecretRepository;
use chatrelay_types::chat::HISTORY_LIMIT;
use chatrelay_types::config::ServiceConfig;

/// The chat handler pinned to SQLite history and the configured backend.
pub type ConcreteChatHandler = ChatHandler<SqliteHistoryStore, ConfiguredBackendFactory>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub chat_handler: Arc<ConcreteChatHandler>,
    pub secret_service: Arc<SecretService>,
    pub config: Arc<ServiceConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: resolve config, connect to the DB,
    /// open the vault, wire the handler. The LLM backend is not built here.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_effective_config(&data_dir).await;
        let db_pool = DatabasePool::new(&database_url(&data_dir, &config.conversations_table)).await?;

        // The vault master key lives in a file next to the database.
        let vault_crypto = VaultCrypto::from_key_file(&data_dir.join(KEY_FILE_NAME))?;
        let vault_provider =
            VaultSecretProvider::new(SqliteSecretRepository::new(db_pool.clone()), vault_crypto);
        let secret_service = Arc::new(SecretService::new(build_secret_chain(vault_provider, true)));

        tracing::debug!(data_dir = %data_dir.display(), "Application state initialized");

        Ok(Self::from_parts(config, db_pool, secret_service, data_dir))
    }

    /// Assemble state from already-constructed parts.
    pub fn from_parts(
        config: ServiceConfig,
        db_pool: DatabasePool,
        secret_service: Arc<SecretService>,
        data_dir: PathBuf,
    ) -> Self {
        let history = HistoryService::new(SqliteHistoryStore::new(db_pool.clone()));
        let factory = ConfiguredBackendFactory::new(config.clone(), Arc::clone(&secret_service));
        let chat_handler = ChatHandler::new(history, LazyBackend::new(factory), HISTORY_LIMIT);

        Self {
            chat_handler: Arc::new(chat_handler),
            secret_service,
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
