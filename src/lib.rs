//! chat-shield: client-side DLP for LLM chat.
//!
//! This is the app shell that wires together:
//! - Masking and restoration (safety/)
//! - Backend transport (backend/)
//! - Per-message pipeline (chat.rs), rendering (display.rs), audit (audit.rs)
//! - Configuration and CLI (config.rs, cli.rs)

pub mod audit;
pub mod backend;
pub mod chat;
pub mod cli;
pub mod config;
pub mod display;
pub mod safety;

use chat::{ChatError, ChatSession};
use cli::{Cli, Command};
use config::Config;
use safety::{RuleSet, Tokenizer, Vault};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};

/// Entry point, called by `main` after `.env` is loaded and args parsed.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = cli.config();
    config.validate()?;

    match cli.command.clone().unwrap_or(Command::Chat) {
        Command::Protect { text } => protect_once(&config, text).await,
        Command::Chat => chat_loop(&config, cli.html).await,
    }
}

/// Mask text without contacting the backend and print the result as JSON.
async fn protect_once(config: &Config, text: Option<String>) -> anyhow::Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    println!("{}", protect_json(config, text.trim_end_matches('\n'))?);
    Ok(())
}

/// Protected text and detection log as pretty-printed JSON.
fn protect_json(config: &Config, text: &str) -> serde_json::Result<String> {
    let tokenizer = Tokenizer::new(RuleSet::builtin().without(&config.skip));
    let mut vault = Vault::new();
    let protected = tokenizer.protect(text, &mut vault);
    serde_json::to_string_pretty(&protected)
}

/// Read one message per line from stdin until EOF or `exit`.
async fn chat_loop(config: &Config, html: bool) -> anyhow::Result<()> {
    let mut session = ChatSession::from_config(config)?;
    log::info!(
        "[CHAT] Backend {} (masking: {:?}, timeout: {}s)",
        session.backend().url(),
        config.masking,
        config.timeout.as_secs()
    );

    eprintln!("chat-shield: connected to {}. Type `exit` to quit.", config.backend_url);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "exit" | "quit") {
            break;
        }

        match session.send(line).await {
            Ok(exchange) => {
                if html {
                    println!("{}", exchange.html);
                } else {
                    println!("{}", exchange.restored.text);
                }
            }
            Err(ChatError::EmptyMessage) => {}
            Err(e) => eprintln!("Connection error: {}", e),
        }
    }

    Ok(())
}
