//! Chat session: one message at a time through protect -> send -> restore
//! -> render.
//!
//! `send` takes `&mut self`, so a session can never have two messages in
//! flight and its vault always belongs to the message being answered.
//! Independent conversations use independent sessions.

use crate::audit::{AuditKind, AuditLog, JsonlSink, LogSink};
use crate::backend::{BackendClient, BackendError};
use crate::config::{Config, MaskingMode};
use crate::display;
use crate::safety::{Detection, FingerprintKey, Protected, Restored, RuleSet, Tokenizer, Vault};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Audit(#[from] crate::audit::AuditError),
}

/// Everything that happened to one message.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Text actually sent to the backend.
    pub sent: String,
    pub detections: Vec<Detection>,
    /// Reply as received, tokens included.
    pub raw_reply: String,
    pub restored: Restored,
    pub html: String,
}

pub struct ChatSession {
    backend: BackendClient,
    tokenizer: Tokenizer,
    vault: Vault,
    masking: MaskingMode,
    annotate: bool,
    reveal_values: bool,
    /// Keys the fingerprints in this session's audit entries.
    fingerprints: FingerprintKey,
    audit: AuditLog,
}

impl ChatSession {
    pub fn new(backend: BackendClient, tokenizer: Tokenizer, audit: AuditLog) -> Self {
        Self {
            backend,
            tokenizer,
            vault: Vault::new(),
            masking: MaskingMode::Client,
            annotate: true,
            reveal_values: false,
            fingerprints: FingerprintKey::random(),
            audit,
        }
    }

    /// Build a session with a log-backed audit trail, plus a JSON-lines
    /// file when `config.audit_file` is set.
    pub fn from_config(config: &Config) -> Result<Self, ChatError> {
        let backend = BackendClient::new(&config.backend_url, config.timeout)?;
        let tokenizer = Tokenizer::new(RuleSet::builtin().without(&config.skip));

        let mut audit = AuditLog::new().with_sink(LogSink);
        if let Some(path) = &config.audit_file {
            audit = audit.with_sink(JsonlSink::open(path)?);
        }

        Ok(Self::new(backend, tokenizer, audit)
            .masking(config.masking)
            .annotate(config.annotate)
            .reveal_values(config.reveal_values))
    }

    pub fn masking(mut self, masking: MaskingMode) -> Self {
        self.masking = masking;
        self
    }

    pub fn annotate(mut self, annotate: bool) -> Self {
        self.annotate = annotate;
        self
    }

    pub fn reveal_values(mut self, reveal: bool) -> Self {
        self.reveal_values = reveal;
        self
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Vault of the most recent message.
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub async fn send(&mut self, raw: &str) -> Result<Exchange, ChatError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let protected = match self.masking {
            MaskingMode::Client => self.tokenizer.protect(raw, &mut self.vault),
            MaskingMode::Server => {
                self.vault.clear();
                Protected::unmasked(raw)
            }
        };
        self.audit_outgoing(raw, &protected);

        let raw_reply = match self.backend.send(&protected.text).await {
            Ok(reply) => reply,
            Err(e) => {
                self.audit.record(AuditKind::Err, e.to_string(), None);
                return Err(e.into());
            }
        };
        let shown = self.audit_text(&raw_reply, "Reply");
        self.audit.record(AuditKind::Out, shown, None);

        let restored = self.vault.restore(&raw_reply);
        if restored.changed() {
            self.audit.record(
                AuditKind::Ok,
                format!("{} sensitive values re-inserted locally.", restored.spans.len()),
                None,
            );
        }
        if !restored.unresolved.is_empty() {
            log::warn!(
                "[CHAT] Reply referenced {} unknown tokens; left as-is",
                restored.unresolved.len()
            );
        }

        let html = display::render_html(&restored, self.annotate);

        Ok(Exchange {
            sent: protected.text,
            detections: protected.detections,
            raw_reply,
            restored,
            html,
        })
    }

    fn audit_outgoing(&mut self, raw: &str, protected: &Protected) {
        let shown = if self.reveal_values { raw } else { protected.text.as_str() };
        let shown = self.audit_text(shown, "Message");
        self.audit.record(AuditKind::In, shown, None);

        if protected.has_detections() {
            let details = protected
                .detections
                .iter()
                .map(|d| d.describe(&self.fingerprints, self.reveal_values))
                .collect();
            self.audit.record(
                AuditKind::Dlp,
                format!("{} sensitive values detected.", protected.detections.len()),
                Some(details),
            );
            self.audit.record(
                AuditKind::Info,
                format!("Sending to backend: \"{}\"", protected.text),
                None,
            );
        } else if self.masking == MaskingMode::Server {
            self.audit
                .record(AuditKind::Info, "Masking deferred to backend. Sending raw text.", None);
        } else {
            self.audit
                .record(AuditKind::Info, "No sensitive data detected. Sending as-is.", None);
        }
    }

    /// Text for an IN or OUT entry. With server masking nothing on this side
    /// knows which parts are sensitive, so only the length is recorded.
    fn audit_text(&self, text: &str, label: &str) -> String {
        if self.masking == MaskingMode::Server && !self.reveal_values {
            format!(
                "{} of {} chars, masking deferred to backend.",
                label,
                text.chars().count()
            )
        } else {
            text.to_string()
        }
    }
}
