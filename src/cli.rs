//! Command-line interface.

use crate::audit::JsonlSink;
use crate::config::{Config, MaskingMode, DEFAULT_BACKEND_URL, DEFAULT_TIMEOUT_SECS};
use crate::safety::Category;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "chat-shield",
    version,
    about = "Chat with an LLM backend without sending it your personal data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Chat backend endpoint (POST, JSON).
    #[arg(long, env = "CHAT_SHIELD_BACKEND_URL", default_value = DEFAULT_BACKEND_URL, global = true)]
    pub backend_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "CHAT_SHIELD_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout_secs: u64,

    /// Where sensitive values are masked.
    #[arg(long, env = "CHAT_SHIELD_MASKING", value_enum, default_value_t = MaskingMode::Client, global = true)]
    pub masking: MaskingMode,

    /// Do not wrap restored values in a hover annotation.
    #[arg(long, env = "CHAT_SHIELD_NO_ANNOTATE", global = true)]
    pub no_annotate: bool,

    /// Categories to leave unmasked, e.g. `PER,EMP`.
    #[arg(long, env = "CHAT_SHIELD_SKIP", value_delimiter = ',', global = true)]
    pub skip: Vec<Category>,

    /// Append the audit trail to the default file in the user data dir.
    #[arg(long, global = true)]
    pub audit: bool,

    /// Append the audit trail to this file.
    #[arg(long, env = "CHAT_SHIELD_AUDIT_FILE", global = true)]
    pub audit_file: Option<PathBuf>,

    /// Write raw values instead of fingerprints to the audit trail.
    #[arg(long, env = "CHAT_SHIELD_REVEAL_VALUES", global = true)]
    pub reveal_values: bool,

    /// Print replies as HTML instead of plain text.
    #[arg(long, global = true)]
    pub html: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Interactive chat, one message per line (default).
    Chat,
    /// Mask text locally and print the result as JSON; nothing is sent.
    Protect {
        /// Text to mask; read from stdin when omitted.
        text: Option<String>,
    },
}

impl Cli {
    pub fn config(&self) -> Config {
        let audit_file = self
            .audit_file
            .clone()
            .or_else(|| self.audit.then(JsonlSink::default_path));

        Config {
            backend_url: self.backend_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            masking: self.masking,
            annotate: !self.no_annotate,
            skip: self.skip.clone(),
            audit_file,
            reveal_values: self.reveal_values,
        }
    }
}
