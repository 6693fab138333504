//! Conversation history CLI commands: show, purge.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_types::chat::{HISTORY_LIMIT, MessageRole};

use crate::state::AppState;

/// Print the history the chat handler would send for `conversation_id`.
pub async fn show_history(
    state: &AppState,
    conversation_id: &str,
    limit: Option<u32>,
    json: bool,
) -> Result<()> {
    let limit = limit.unwrap_or(HISTORY_LIMIT);
    let messages = state
        .chat_handler
        .history()
        .load_history(conversation_id, limit)
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No stored turns for conversation '{}'",
            style("i").blue().bold(),
            style(conversation_id).bold()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for (i, message) in messages.iter().enumerate() {
        let role = match message.role {
            MessageRole::User => Cell::new("user").fg(Color::Cyan),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Green),
        };
        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            role,
            Cell::new(&message.content),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Delete every expired turn.
pub async fn purge(state: &AppState, json: bool) -> Result<()> {
    let removed = state.chat_handler.history().purge_expired().await?;

    if json {
        println!("{}", serde_json::json!({ "purged": removed }));
    } else {
        println!(
            "  {} Purged {} expired turn{}",
            style("✓").green().bold(),
            style(removed).bold(),
            if removed == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
