//! Audit trail of each message's trip through the DLP layer.
//!
//! Entries are write-only: nothing in the pipeline reads them back. A sink
//! that fails is logged and skipped so auditing never blocks a message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditKind {
    /// Message typed by the user.
    In,
    /// Sensitive values were masked.
    Dlp,
    Info,
    /// Reply as received from the backend, tokens included.
    Out,
    /// Values were restored locally.
    Ok,
    Err,
}

impl AuditKind {
    pub fn badge(self) -> &'static str {
        match self {
            AuditKind::In => ">> USER:",
            AuditKind::Dlp => "!! MASKED:",
            AuditKind::Info => "INFO:",
            AuditKind::Out => "<< AI (tokenized):",
            AuditKind::Ok => "OK:",
            AuditKind::Err => "ERROR:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: AuditKind,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl AuditEntry {
    pub fn now(kind: AuditKind, text: impl Into<String>, details: Option<Vec<String>>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            text: text.into(),
            details,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("Failed to open audit file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write audit entry: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to serialize audit entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait AuditSink: Send {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError>;
}

/// Writes entries through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl AuditSink for LogSink {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        let details = entry
            .details
            .as_ref()
            .map(|d| format!(" [{}]", d.join("; ")))
            .unwrap_or_default();
        match entry.kind {
            AuditKind::Err => log::error!("[AUDIT] {} {}{}", entry.kind.badge(), entry.text, details),
            AuditKind::Dlp => log::warn!("[AUDIT] {} {}{}", entry.kind.badge(), entry.text, details),
            _ => log::info!("[AUDIT] {} {}{}", entry.kind.badge(), entry.text, details),
        }
        Ok(())
    }
}

/// Appends one JSON object per line to a file.
#[derive(Debug)]
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Open `path` for appending, creating parent directories as needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        let open_err = |source| AuditError::Open {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(open_err)?;

        log::info!("[AUDIT] Writing audit trail to {}", path.display());
        Ok(Self { file })
    }

    /// `<data dir>/chat-shield/audit.jsonl`, e.g. `~/.local/share/...` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chat-shield")
            .join("audit.jsonl")
    }
}

impl AuditSink for JsonlSink {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');
        self.file.write_all(&line)?;
        Ok(())
    }
}

/// Keeps entries in memory; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AuditSink for MemorySink {
    fn record(&mut self, entry: &AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.clone());
        Ok(())
    }
}

/// Fan-out over any number of sinks.
#[derive(Default)]
pub struct AuditLog {
    sinks: Vec<Box<dyn AuditSink>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: impl AuditSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn record(&mut self, kind: AuditKind, text: impl Into<String>, details: Option<Vec<String>>) {
        let entry = AuditEntry::now(kind, text, details);
        for sink in &mut self.sinks {
            if let Err(e) = sink.record(&entry) {
                log::warn!("[AUDIT] Sink failed: {}", e);
            }
        }
    }
}
