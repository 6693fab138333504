//! CLI command definitions for the `chatrelay` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod history;
pub mod secret;

use clap::{Parser, Subcommand};

/// Stateless chat relay between HTTP clients and Claude.
#[derive(Parser)]
#[command(name = "chatrelay", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, env = "CHATRELAY_PORT", default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, env = "CHATRELAY_HOST", default_value = "127.0.0.1")]
        host: String,
    },

    /// Store a credential in the encrypted vault.
    SetSecret {
        /// Secret name (e.g. ANTHROPIC_API_KEY).
        key: String,

        /// Secret value. Prompted for with hidden input when omitted.
        #[arg(long)]
        value: Option<String>,
    },

    /// Print the stored history of a conversation.
    History {
        /// Conversation identifier.
        conversation_id: String,

        /// Number of exchanges to load.
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Delete expired conversation turns.
    Purge,
}
