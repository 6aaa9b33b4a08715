//! Detection rules, applied in a fixed priority order.
//!
//! A rule is a category plus a regex. When the regex declares a named group
//! `value`, only that group is tokenized and the rest of the match (the
//! trigger phrase, the terminator) stays in clear text. Otherwise the whole
//! match is tokenized.
//!
//! The `regex` crate has no lookahead, so contextual rules consume their
//! terminator (`,`, `.`, a conjunction, end of text). None of the triggers
//! can begin inside a terminator, so this finds the same captures a
//! lookahead would.

use super::category::Category;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Name of the capture group holding the span to tokenize.
pub const VALUE_GROUP: &str = "value";

const EMAIL: &str = r"[A-Za-z0-9_.\-]+@(?:[A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}";

// Digit runs use ASCII word boundaries: `Nº12345678` and `Documentó12345678`
// still count as a standalone number.
const TAX_ID: &str = r"(?-u:\b)(?:10|20)[0-9]{9}(?-u:\b)";

const NATIONAL_ID: &str = r"(?-u:\b)[0-9]{8}(?-u:\b)";

const PHONE: &str = r"(?-u:\b)9[0-9]{8}(?-u:\b)";

// Street abbreviations may sit inside the captured address; their period
// does not end the capture.
const ADDRESS: &str = concat!(
    r"(?i)(?:viv[oe] en|domicilio|direcci[óo]n|calle|av\.|avenida|jr\.|jir[óo]n|psje\.",
    r"|\blives? at|\baddress|\bstreet|\bavenue)",
    r"\s+(?P<value>(?:\b(?:av|ave|jr|psje|pje|mz|lt|nro|dpto|urb)\.|[\p{L}\p{N}.\s#\-])+?)",
    r"\s*(?:,|\.|y la|and the|$)",
);

const ORGANIZATION: &str = concat!(
    r"(?i)(?:empresa|raz[óo]n social|consorcio|\bcompany|\bcorporate name|\bconsortium)",
    r"\s+(?P<value>(?:\b(?:s\.a\.c|s\.a\.a|s\.r\.l|e\.i\.r\.l|s\.a|inc|corp|ltd)\.|[\p{L}\p{N}.\s])+?)",
    r"\s*(?:,|\.|y el|and the|$)",
);

// Trigger words are case-insensitive; the name itself must be capitalized.
const PERSON: &str = concat!(
    r"(?i:soy|me llamo|mi nombre es|usuario|señora|señor|sra\.|sr\.",
    r"|\bi am|\bmy name is|\bmrs\.|\bmr\.)",
    r"\s+(?P<value>[A-ZÁÉÍÓÚÑ][a-zñáéíóúü]+(?:\s+[A-ZÁÉÍÓÚÑ][a-zñáéíóúü]+){1,3})",
);

static BUILTIN_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    [
        (Category::Email, EMAIL),
        (Category::TaxId, TAX_ID),
        (Category::NationalId, NATIONAL_ID),
        (Category::Phone, PHONE),
        (Category::Address, ADDRESS),
        (Category::Organization, ORGANIZATION),
        (Category::Person, PERSON),
    ]
    .into_iter()
    .map(|(category, pattern)| Rule::new(category, pattern).unwrap())
    .collect()
});

/// One detection rule.
#[derive(Debug, Clone)]
pub struct Rule {
    category: Category,
    pattern: Regex,
    contextual: bool,
}

impl Rule {
    pub fn new(category: Category, pattern: &str) -> Result<Self, regex::Error> {
        let pattern = Regex::new(pattern)?;
        let contextual = pattern
            .capture_names()
            .any(|name| name == Some(VALUE_GROUP));
        Ok(Self {
            category,
            pattern,
            contextual,
        })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// True when only the `value` group is tokenized.
    pub fn is_contextual(&self) -> bool {
        self.contextual
    }

    /// Byte ranges of `text` this rule wants replaced, in order and
    /// non-overlapping. Empty matches are dropped.
    pub fn spans(&self, text: &str) -> Vec<Range<usize>> {
        if self.contextual {
            self.pattern
                .captures_iter(text)
                .filter_map(|caps| caps.name(VALUE_GROUP))
                .map(|m| m.range())
                .filter(|r| !r.is_empty())
                .collect()
        } else {
            self.pattern
                .find_iter(text)
                .map(|m| m.range())
                .filter(|r| !r.is_empty())
                .collect()
        }
    }
}

/// Ordered list of rules. Order is priority: each rule sees only the text
/// already rewritten by the rules before it.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Email, tax ID, national ID, phone, address, organization, person.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_RULES.clone())
    }

    /// Drop every rule for the given categories.
    pub fn without(mut self, skip: &[Category]) -> Self {
        self.rules.retain(|rule| !skip.contains(&rule.category));
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(category: Category) -> Rule {
        RuleSet::builtin()
            .rules()
            .iter()
            .find(|r| r.category() == category)
            .cloned()
            .unwrap()
    }

    fn values(category: Category, text: &str) -> Vec<String> {
        rule(category)
            .spans(text)
            .into_iter()
            .map(|r| text[r].to_string())
            .collect()
    }

    #[test]
    fn builtin_order_is_fixed() {
        let order: Vec<_> = RuleSet::builtin()
            .rules()
            .iter()
            .map(|r| r.category())
            .collect();
        assert_eq!(
            order,
            vec![
                Category::Email,
                Category::TaxId,
                Category::NationalId,
                Category::Phone,
                Category::Address,
                Category::Organization,
                Category::Person,
            ]
        );
    }

    #[test]
    fn only_context_rules_capture() {
        for r in RuleSet::builtin().rules() {
            let expected = matches!(
                r.category(),
                Category::Address | Category::Organization | Category::Person
            );
            assert_eq!(r.is_contextual(), expected, "{}", r.category());
        }
    }

    #[test]
    fn email_matches_whole_address() {
        assert_eq!(values(Category::Email, "correo ana@x.com"), vec!["ana@x.com"]);
        assert_eq!(
            values(Category::Email, "escribe a juan.perez@empresa.com.pe."),
            vec!["juan.perez@empresa.com.pe"]
        );
        assert!(values(Category::Email, "no hay arroba aqui").is_empty());
    }

    #[test]
    fn tax_id_requires_prefix_and_length() {
        assert_eq!(values(Category::TaxId, "RUC 20123456789"), vec!["20123456789"]);
        assert_eq!(values(Category::TaxId, "RUC 10456789012"), vec!["10456789012"]);
        assert!(values(Category::TaxId, "30123456789").is_empty());
        assert!(values(Category::TaxId, "201234567890").is_empty());
    }

    #[test]
    fn national_id_is_exactly_eight_digits() {
        assert_eq!(values(Category::NationalId, "DNI 12345678."), vec!["12345678"]);
        assert!(values(Category::NationalId, "123456789").is_empty());
        assert!(values(Category::NationalId, "1234567").is_empty());
    }

    #[test]
    fn phone_starts_with_nine() {
        assert_eq!(values(Category::Phone, "cel 987654321"), vec!["987654321"]);
        assert!(values(Category::Phone, "887654321").is_empty());
    }

    #[test]
    fn digits_after_non_ascii_letter_are_detected() {
        assert_eq!(values(Category::NationalId, "DNI Nº12345678"), vec!["12345678"]);
        assert_eq!(values(Category::NationalId, "Documentó12345678"), vec!["12345678"]);
        assert_eq!(values(Category::TaxId, "RUC Nº20123456789"), vec!["20123456789"]);
        assert_eq!(values(Category::Phone, "teléfonoñ987654321"), vec!["987654321"]);
    }

    #[test]
    fn digits_after_underscore_are_not_word_bounded() {
        assert!(values(Category::NationalId, "{{DNI_12345678}}").is_empty());
    }

    #[test]
    fn address_keeps_street_abbreviation() {
        assert_eq!(
            values(Category::Address, "Vivo en Av. Los Pinos 123, cerca del parque"),
            vec!["Av. Los Pinos 123"]
        );
        assert_eq!(
            values(Category::Address, "Mi domicilio Jr. Huallaga 320, Lima"),
            vec!["Jr. Huallaga 320"]
        );
    }

    #[test]
    fn address_stops_at_conjunction_and_period() {
        assert_eq!(
            values(Category::Address, "calle Las Flores 45 y la referencia es el mercado"),
            vec!["Las Flores 45"]
        );
        assert_eq!(
            values(Category::Address, "I live at 221B Baker Street and the rest is history."),
            vec!["221B Baker Street"]
        );
        assert_eq!(values(Category::Address, "avenida Brasil 900. Gracias"), vec!["Brasil 900"]);
    }

    #[test]
    fn address_gives_up_on_token_inside_capture() {
        assert!(values(Category::Address, "calle {{LOC_0}}, Lima").is_empty());
    }

    #[test]
    fn organization_keeps_company_suffix() {
        assert_eq!(
            values(Category::Organization, "razón social Comercial Lima S.R.L. y el gerente"),
            vec!["Comercial Lima S.R.L."]
        );
        assert_eq!(
            values(Category::Organization, "Trabajo en la empresa Constructora Andina, en Lima"),
            vec!["Constructora Andina"]
        );
    }

    #[test]
    fn person_requires_two_to_four_capitalized_words() {
        assert_eq!(
            values(Category::Person, "Hola, soy Juan Pérez y necesito ayuda"),
            vec!["Juan Pérez"]
        );
        assert_eq!(values(Category::Person, "My name is John Smith"), vec!["John Smith"]);
        assert_eq!(
            values(Category::Person, "me llamo María José Quispe Ñahui Torres"),
            vec!["María José Quispe Ñahui"]
        );
        assert!(values(Category::Person, "soy Ana").is_empty());
        assert!(values(Category::Person, "soy juan perez").is_empty());
    }

    #[test]
    fn without_drops_categories() {
        let rules = RuleSet::builtin().without(&[Category::Person, Category::Email]);
        assert_eq!(rules.rules().len(), 5);
        assert!(rules
            .rules()
            .iter()
            .all(|r| r.category() != Category::Person && r.category() != Category::Email));
    }

    #[test]
    fn custom_rule_without_group_tokenizes_whole_match() {
        let rule = Rule::new(Category::Phone, r"\+51 ?9[0-9]{8}").unwrap();
        assert!(!rule.is_contextual());
        assert_eq!(rule.spans("llama al +51 987654321"), vec![9..22]);
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        assert!(Rule::new(Category::Email, "(unclosed").is_err());
    }
}
