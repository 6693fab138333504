//! Service configuration loader for chatrelay.
//!
//! Reads `config.toml` from the data directory (`~/.chatrelay/` by default)
//! and deserializes it into [`ServiceConfig`]. Falls back to defaults when
//! the file is missing or malformed, then applies environment overrides.

use std::path::{Path, PathBuf};

use chatrelay_types::config::ServiceConfig;
use chatrelay_types::llm::ProviderType;

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "CHATRELAY_DATA_DIR";

/// Resolve the data directory: `$CHATRELAY_DATA_DIR`, else `~/.chatrelay`.
pub fn resolve_data_dir() -> PathBuf {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".chatrelay"),
    }
}

/// Load service configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ServiceConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_service_config(data_dir: &Path) -> ServiceConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServiceConfig::default();
        }
    };

    match toml::from_str::<ServiceConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServiceConfig::default()
        }
    }
}

/// Apply environment variable overrides on top of a loaded config.
///
/// `lookup` is `std::env::var(..).ok()` in production. Empty values are ignored.
pub fn apply_env_overrides<F>(mut config: ServiceConfig, lookup: F) -> ServiceConfig
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(table) = var("CONVERSATIONS_TABLE") {
        config.conversations_table = table;
    }
    if let Some(region) = var("AWS_REGION") {
        config.region = region;
    }
    if let Some(flag) = var("USE_BEDROCK") {
        config.backend = if flag.trim().eq_ignore_ascii_case("true") {
            ProviderType::Bedrock
        } else {
            ProviderType::Anthropic
        };
    }
    if let Some(name) = var("ANTHROPIC_API_KEY_PARAMETER") {
        config.credential_name = Some(name);
    }
    if let Some(model) = var("CHATRELAY_MODEL") {
        config.model = Some(model);
    }

    config
}

/// Load `config.toml` and apply the process environment.
pub async fn load_effective_config(data_dir: &Path) -> ServiceConfig {
    let config = apply_env_overrides(load_service_config(data_dir).await, |name| {
        std::env::var(name).ok()
    });
    tracing::debug!(
        backend = %config.backend,
        table = %config.conversations_table,
        region = %config.region,
        "Resolved service configuration"
    );
    config
}
