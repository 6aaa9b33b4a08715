//! Safety layer: reversible masking of sensitive data.
//!
//! Outgoing text passes through the tokenizer before it reaches the
//! backend. Replies pass through the vault before they reach the user.

pub mod category;
pub mod fingerprint;
pub mod rules;
pub mod tokenize;
pub mod vault;

pub use category::Category;
pub use fingerprint::FingerprintKey;
pub use rules::{Rule, RuleSet};
pub use tokenize::{Detection, Protected, Tokenizer};
pub use vault::{Restored, RestoredSpan, Vault};
