//! Sensitive data tokenization: scans outgoing text for PII and swaps each
//! value for a reversible `{{TAG_n}}` placeholder before it reaches the
//! backend.

use super::category::Category;
use super::fingerprint::FingerprintKey;
use super::rules::RuleSet;
use super::vault::{self, Vault};
use serde::Serialize;
use std::fmt;

/// One detected value, for the audit trail. Restoration never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub category: Category,
    pub value: String,
    pub token: String,
}

impl Detection {
    /// Audit line. Without `reveal`, the value is replaced by its keyed
    /// fingerprint.
    pub fn describe(&self, key: &FingerprintKey, reveal: bool) -> String {
        if reveal {
            self.to_string()
        } else {
            format!(
                "{}: hmac:{} -> {}",
                self.category.tag(),
                key.fingerprint(&self.value),
                self.token
            )
        }
    }
}

impl fmt::Display for Detection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.category.tag(), self.value, self.token)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Protected {
    pub text: String,
    pub detections: Vec<Detection>,
}

impl Protected {
    /// Text passed through as-is, for when masking is left to the backend.
    pub fn unmasked(text: &str) -> Self {
        Self {
            text: text.to_string(),
            detections: Vec::new(),
        }
    }

    pub fn has_detections(&self) -> bool {
        !self.detections.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    rules: RuleSet,
}

impl Tokenizer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// Mask every sensitive value in `raw`.
    ///
    /// Clears `vault`, then runs each rule as a full pass over the text
    /// rewritten so far. Every span a rule reports gets a fresh token from
    /// its category's counter; the vault and the detection log record it.
    pub fn protect(&self, raw: &str, vault: &mut Vault) -> Protected {
        vault.clear();

        if vault::contains_token_shape(raw) {
            log::warn!("[DLP] Input already contains token-shaped text; it may be altered on restore");
        }

        let mut counters = [0usize; Category::ALL.len()];
        let mut detections = Vec::new();
        let mut text = raw.to_string();

        for rule in self.rules.rules() {
            let spans = rule.spans(&text);
            if spans.is_empty() {
                continue;
            }

            let category = rule.category();
            let mut rewritten = String::with_capacity(text.len());
            let mut last = 0;

            for span in spans {
                let ordinal = &mut counters[category.index()];
                let token = vault::mint(category, *ordinal);
                *ordinal += 1;

                let value = text[span.clone()].to_string();
                rewritten.push_str(&text[last..span.start]);
                rewritten.push_str(&token);
                last = span.end;

                vault.insert(token.clone(), value.clone());
                detections.push(Detection {
                    category,
                    value,
                    token,
                });
            }

            rewritten.push_str(&text[last..]);
            text = rewritten;
        }

        if !detections.is_empty() {
            let summary: Vec<String> = Category::ALL
                .iter()
                .filter(|c| counters[c.index()] > 0)
                .map(|c| format!("{} {}", counters[c.index()], c.tag()))
                .collect();
            log::info!("[DLP] Tokenized {}", summary.join(", "));
        }

        Protected { text, detections }
    }
}
