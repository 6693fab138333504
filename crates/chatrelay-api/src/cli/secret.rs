//! Secret management CLI command.

use anyhow::Result;
use console::style;
use dialoguer::Password;

use chatrelay_core::service::secret::SecretService;

use crate::state::AppState;

/// Set a secret value with hidden input prompt.
///
/// ```bash
/// # Secure prompt (recommended)
/// chatrelay set-secret ANTHROPIC_API_KEY
///
/// # Script/automation mode
/// chatrelay set-secret ANTHROPIC_API_KEY --value sk-...
/// ```
pub async fn set_secret(state: &AppState, key: &str, value: Option<&str>, json: bool) -> Result<()> {
    let secret_value = match value {
        Some(v) => v.to_string(),
        None => Password::new()
            .with_prompt(format!("Enter value for {}", style(key).bold()))
            .interact()?,
    };

    state.secret_service.set_secret(key, &secret_value).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"set": true, "key": key, "masked": SecretService::mask_secret(&secret_value)})
        );
    } else {
        println!(
            "  {} Secret '{}' set ({})",
            style("✓").green().bold(),
            style(key).bold(),
            SecretService::mask_secret(&secret_value)
        );
        if key != state.config.credential_name() {
            println!(
                "  {} The {} backend reads '{}'",
                style("i").blue().bold(),
                state.config.backend.display_name(),
                style(state.config.credential_name()).yellow()
            );
        }
    }

    Ok(())
}
