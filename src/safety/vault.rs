//! Token vault and restoration.
//!
//! The vault maps each token minted for one message to the value it
//! replaced. Restoration is a single left-to-right scan for token-shaped
//! substrings; each one is looked up by its full text, so `{{PER_1}}` can
//! never match inside `{{PER_10}}` and restored values are never rescanned.

use super::category::Category;
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[A-Z]+_[0-9]+\}\}").unwrap());

/// Build the token for the `ordinal`-th value of `category` in a message.
pub fn mint(category: Category, ordinal: usize) -> String {
    format!("{{{{{}_{}}}}}", category.tag(), ordinal)
}

/// True if `text` holds anything shaped like a token.
pub fn contains_token_shape(text: &str) -> bool {
    TOKEN_PATTERN.is_match(text)
}

/// Token -> original value for the message currently in flight.
///
/// Entries keep detection order. `Debug` prints tokens only.
#[derive(Clone, Default)]
pub struct Vault {
    entries: IndexMap<String, String>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn insert(&mut self, token: String, value: String) {
        self.entries.insert(token, value);
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// Replace every known token in `text` with its original value.
    ///
    /// Tokens missing from the vault are left as literal text and reported
    /// in [`Restored::unresolved`].
    pub fn restore(&self, text: &str) -> Restored {
        let mut out = String::with_capacity(text.len());
        let mut spans = Vec::new();
        let mut unresolved = Vec::new();
        let mut last = 0;

        for m in TOKEN_PATTERN.find_iter(text) {
            match self.entries.get(m.as_str()) {
                Some(value) => {
                    out.push_str(&text[last..m.start()]);
                    let start = out.len();
                    out.push_str(value);
                    spans.push(RestoredSpan {
                        start,
                        end: out.len(),
                        token: m.as_str().to_string(),
                    });
                    last = m.end();
                }
                None => unresolved.push(m.as_str().to_string()),
            }
        }
        out.push_str(&text[last..]);

        Restored {
            text: out,
            spans,
            unresolved,
        }
    }
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("tokens", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Where a value was put back into the restored text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoredSpan {
    /// Byte offsets into [`Restored::text`].
    pub start: usize,
    pub end: usize,
    pub token: String,
}

/// Result of [`Vault::restore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Restored {
    pub text: String,
    pub spans: Vec<RestoredSpan>,
    pub unresolved: Vec<String>,
}

impl Restored {
    /// True if at least one token was replaced.
    pub fn changed(&self) -> bool {
        !self.spans.is_empty()
    }
}
