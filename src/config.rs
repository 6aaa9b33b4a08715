//! Runtime configuration.
//!
//! Values come from CLI flags, falling back to `CHAT_SHIELD_*` environment
//! variables (a `.env` file is loaded first), falling back to the defaults
//! below.

use crate::safety::Category;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/chat";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where sensitive values get masked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MaskingMode {
    /// Mask locally; the backend only ever sees tokens.
    #[default]
    Client,
    /// Send raw text; the backend does its own masking.
    Server,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub backend_url: String,
    pub timeout: Duration,
    pub masking: MaskingMode,
    /// Wrap restored values in a hover annotation when rendering HTML.
    pub annotate: bool,
    /// Categories to leave unmasked.
    pub skip: Vec<Category>,
    pub audit_file: Option<PathBuf>,
    /// Put raw values (not fingerprints) in audit entries.
    pub reveal_values: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            masking: MaskingMode::Client,
            annotate: true,
            skip: Vec::new(),
            audit_file: None,
            reveal_values: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Backend URL '{0}' is not a valid http(s) URL")]
    InvalidUrl(String),

    #[error("Request timeout must be greater than zero")]
    ZeroTimeout,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match Url::parse(&self.backend_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => return Err(ConfigError::InvalidUrl(self.backend_url.clone())),
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}
