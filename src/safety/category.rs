//! Sensitive data categories and the tags they carry inside tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of sensitive value a rule detects. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    NationalId,
    TaxId,
    Person,
    Organization,
    Address,
    Email,
    Phone,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::NationalId,
        Category::TaxId,
        Category::Person,
        Category::Organization,
        Category::Address,
        Category::Email,
        Category::Phone,
    ];

    /// Tag embedded in tokens, e.g. `DNI` in `{{DNI_0}}`.
    pub fn tag(self) -> &'static str {
        match self {
            Category::NationalId => "DNI",
            Category::TaxId => "RUC",
            Category::Person => "PER",
            Category::Organization => "EMP",
            Category::Address => "LOC",
            Category::Email => "MAIL",
            Category::Phone => "TELF",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::NationalId => "national-id",
            Category::TaxId => "tax-id",
            Category::Person => "person",
            Category::Organization => "organization",
            Category::Address => "address",
            Category::Email => "email",
            Category::Phone => "phone",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Category::NationalId => 0,
            Category::TaxId => 1,
            Category::Person => 2,
            Category::Organization => 3,
            Category::Address => 4,
            Category::Email => 5,
            Category::Phone => 6,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown sensitive category '{0}' (expected one of DNI, RUC, PER, EMP, LOC, MAIL, TELF)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts either the token tag (`DNI`) or the kebab-case name
    /// (`national-id`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.tag().eq_ignore_ascii_case(trimmed) || c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}
