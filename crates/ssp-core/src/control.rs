//! # Control Identifier Normalization
//!
//! Parses the many textual spellings of a security control identifier into
//! one canonical [`ControlId`] and defines the total order used for every
//! comparison, sort and deduplication in the stack.
//!
//! ## Grammars
//!
//! Tried in priority order; the first grammar that matches wins.
//!
//! | # | Grammar | Examples |
//! |---|---------|----------|
//! | 1 | dotted | `AC.2`, `ac.2.1` |
//! | 2 | hyphen + parenthesized enhancement | `AC-2(1)`, `ac-2 (1)` |
//! | 3 | bare hyphen | `AC-2` |
//! | 4 | space-separated | `AC 2`, `AC 2 (1)` |
//! | 5 | no separator | `AC2`, `ac2(1)` |
//! | 6 | OSCAL | `ac-2.1` |
//!
//! Matching is case-insensitive and the family is always uppercased.
//! Numbers are base-10 without any digit-count assumption; a value that does
//! not fit in `u32` is malformed rather than truncated.
//!
//! ## Ordering Invariant
//!
//! Identifiers order by family, then number, then enhancement, with a
//! missing enhancement sorting before any present one:
//! `AC-9 < AC-10 < AC-10(1)`. Raw-text comparison is never used.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{SspError, SspResult};

// ---------------------------------------------------------------------------
// Grammar table
// ---------------------------------------------------------------------------

/// A recognized textual grammar for control identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grammar {
    /// `AC.2` or `AC.2.1`.
    Dotted,
    /// `AC-2(1)`.
    HyphenEnhancement,
    /// `AC-2`.
    Hyphen,
    /// `AC 2`, optionally `AC 2 (1)`.
    Spaced,
    /// `AC2`, optionally `AC2(1)`.
    Compact,
    /// `ac-2.1`, the form used by OSCAL catalogs and profiles.
    Oscal,
}

impl Grammar {
    /// All grammars in match priority order.
    pub fn in_priority_order() -> &'static [Grammar] {
        &[
            Self::Dotted,
            Self::HyphenEnhancement,
            Self::Hyphen,
            Self::Spaced,
            Self::Compact,
            Self::Oscal,
        ]
    }

    /// Short name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dotted => "dotted",
            Self::HyphenEnhancement => "hyphen-enhancement",
            Self::Hyphen => "hyphen",
            Self::Spaced => "spaced",
            Self::Compact => "compact",
            Self::Oscal => "oscal",
        }
    }

    /// Anchored pattern. Capture 1 is the family, 2 the number, 3 the
    /// optional enhancement.
    fn pattern(&self) -> &'static str {
        match self {
            Self::Dotted => r"^([A-Za-z]{2})\.([0-9]+)(?:\.([0-9]+))?$",
            Self::HyphenEnhancement => r"^([A-Za-z]{2})-([0-9]+)\s*\(\s*([0-9]+)\s*\)$",
            Self::Hyphen => r"^([A-Za-z]{2})-([0-9]+)$",
            Self::Spaced => r"^([A-Za-z]{2})\s+([0-9]+)(?:\s*\(\s*([0-9]+)\s*\))?$",
            Self::Compact => r"^([A-Za-z]{2})([0-9]+)(?:\s*\(\s*([0-9]+)\s*\))?$",
            Self::Oscal => r"^([A-Za-z]{2})-([0-9]+)\.([0-9]+)$",
        }
    }
}

impl std::fmt::Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

type Extractor = fn(&Captures<'_>) -> Option<(String, u32, Option<u32>)>;

/// Every grammar shares the same capture layout.
fn family_number_enhancement(caps: &Captures<'_>) -> Option<(String, u32, Option<u32>)> {
    let family = caps.get(1)?.as_str().to_ascii_uppercase();
    let number = caps.get(2)?.as_str().parse::<u32>().ok()?;
    let enhancement = match caps.get(3) {
        Some(m) => Some(m.as_str().parse::<u32>().ok()?),
        None => None,
    };
    Some((family, number, enhancement))
}

fn grammar_table() -> &'static [(Grammar, Regex, Extractor)] {
    static TABLE: OnceLock<Vec<(Grammar, Regex, Extractor)>> = OnceLock::new();
    TABLE.get_or_init(|| {
        Grammar::in_priority_order()
            .iter()
            .filter_map(|g| {
                Regex::new(g.pattern())
                    .ok()
                    .map(|re| (*g, re, family_number_enhancement as Extractor))
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// ControlId
// ---------------------------------------------------------------------------

/// Textual rendering of a [`ControlId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderForm {
    /// `FAMILY.NUMBER[.ENHANCEMENT]`
    Dotted,
    /// `FAMILY-NUMBER[(ENHANCEMENT)]`
    #[default]
    Hyphenated,
}

/// Canonical security control identifier.
///
/// Serializes as the hyphenated form (`AC-2(1)`). Deserialization routes
/// through [`ControlId::parse`], so every accepted spelling loads and an
/// invalid one is rejected rather than silently kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId {
    family: String,
    number: u32,
    enhancement: Option<u32>,
}

impl ControlId {
    /// Build an identifier from its parts.
    ///
    /// # Errors
    ///
    /// [`SspError::MalformedIdentifier`] if the family is not two ASCII
    /// letters or the number is zero.
    pub fn new(family: &str, number: u32, enhancement: Option<u32>) -> SspResult<Self> {
        let valid_family = family.len() == 2 && family.chars().all(|c| c.is_ascii_alphabetic());
        if !valid_family || number == 0 {
            return Err(SspError::MalformedIdentifier {
                input: format!("{family}-{number}"),
            });
        }
        Ok(Self {
            family: family.to_ascii_uppercase(),
            number,
            enhancement,
        })
    }

    /// Parse any recognized spelling into the canonical identifier.
    ///
    /// # Errors
    ///
    /// [`SspError::MalformedIdentifier`] carrying the original input when no
    /// grammar matches, including for empty or whitespace-only text.
    pub fn parse(text: &str) -> SspResult<Self> {
        Self::parse_with_grammar(text).map(|(id, _)| id)
    }

    /// Parse and report which grammar matched.
    pub fn parse_with_grammar(text: &str) -> SspResult<(Self, Grammar)> {
        let malformed = || SspError::MalformedIdentifier {
            input: text.to_string(),
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(malformed());
        }
        for (grammar, re, extract) in grammar_table() {
            let Some(caps) = re.captures(trimmed) else {
                continue;
            };
            // A grammar that matched syntactically but overflowed is a
            // malformed identifier, not a cue to try looser grammars.
            let (family, number, enhancement) = extract(&caps).ok_or_else(malformed)?;
            if number == 0 {
                return Err(malformed());
            }
            return Ok((
                Self {
                    family,
                    number,
                    enhancement,
                },
                *grammar,
            ));
        }
        Err(malformed())
    }

    /// Two-letter uppercase family code (e.g. `AC`).
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Control number within the family.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Enhancement number, if this identifies a control enhancement.
    pub fn enhancement(&self) -> Option<u32> {
        self.enhancement
    }

    /// Whether this identifies a control enhancement.
    pub fn is_enhancement(&self) -> bool {
        self.enhancement.is_some()
    }

    /// The base control of an enhancement (identity for base controls).
    pub fn base(&self) -> Self {
        Self {
            family: self.family.clone(),
            number: self.number,
            enhancement: None,
        }
    }

    /// Render in one of the two canonical textual forms.
    pub fn render(&self, form: RenderForm) -> String {
        match (form, self.enhancement) {
            (RenderForm::Dotted, Some(e)) => format!("{}.{}.{}", self.family, self.number, e),
            (RenderForm::Dotted, None) => format!("{}.{}", self.family, self.number),
            (RenderForm::Hyphenated, Some(e)) => format!("{}-{}({})", self.family, self.number, e),
            (RenderForm::Hyphenated, None) => format!("{}-{}", self.family, self.number),
        }
    }

    /// Render in the lowercase OSCAL form (`ac-2.1`).
    pub fn to_oscal(&self) -> String {
        let family = self.family.to_ascii_lowercase();
        match self.enhancement {
            Some(e) => format!("{family}-{}.{e}", self.number),
            None => format!("{family}-{}", self.number),
        }
    }

    /// Total order over identifiers: family, number, then enhancement with
    /// absence first.
    pub fn compare(a: &Self, b: &Self) -> Ordering {
        a.family
            .cmp(&b.family)
            .then(a.number.cmp(&b.number))
            .then_with(|| match (a.enhancement, b.enhancement) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(x), Some(y)) => x.cmp(&y),
            })
    }
}

impl Ord for ControlId {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(self, other)
    }
}

impl PartialOrd for ControlId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(RenderForm::Hyphenated))
    }
}

impl std::str::FromStr for ControlId {
    type Err = SspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ControlId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.render(RenderForm::Hyphenated))
    }
}

impl<'de> Deserialize<'de> for ControlId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(text: &str) -> ControlId {
        ControlId::parse(text).unwrap_or_else(|e| panic!("failed to parse {text:?}: {e}"))
    }

    #[test]
    fn test_grammar_table_compiles_every_pattern() {
        assert_eq!(grammar_table().len(), Grammar::in_priority_order().len());
    }

    #[test]
    fn test_each_grammar_in_isolation() {
        let cases = [
            ("AC.2.1", Grammar::Dotted),
            ("AC.2", Grammar::Dotted),
            ("AC-2(1)", Grammar::HyphenEnhancement),
            ("AC-2 ( 1 )", Grammar::HyphenEnhancement),
            ("AC-2", Grammar::Hyphen),
            ("AC 2", Grammar::Spaced),
            ("AC 2 (1)", Grammar::Spaced),
            ("AC2", Grammar::Compact),
            ("ac2(1)", Grammar::Compact),
            ("ac-2.1", Grammar::Oscal),
        ];
        for (text, expected) in cases {
            let (_, grammar) = ControlId::parse_with_grammar(text).unwrap();
            assert_eq!(grammar, expected, "{text:?}");
        }
    }

    #[test]
    fn test_spelling_variants_are_equal() {
        let expected = ControlId::new("AC", 2, Some(1)).unwrap();
        for text in ["ac-2(1)", "AC.2.1", "AC 2 (1)", "AC 2(1)", "ac2(1)", "ac-2.1", " AC-2(1) "] {
            assert_eq!(id(text), expected, "{text:?}");
        }
    }

    #[test]
    fn test_family_uppercased() {
        let parsed = id("sc-7");
        assert_eq!(parsed.family(), "SC");
        assert_eq!(parsed.number(), 7);
        assert_eq!(parsed.enhancement(), None);
    }

    #[test]
    fn test_leading_zeros_normalize() {
        assert_eq!(id("AC-02"), id("AC-2"));
        assert_eq!(id("AC-02(03)").to_string(), "AC-2(3)");
    }

    #[test]
    fn test_large_numbers_accepted() {
        let parsed = id("AC-12345(6789)");
        assert_eq!(parsed.number(), 12345);
        assert_eq!(parsed.enhancement(), Some(6789));
    }

    #[test]
    fn test_overflow_is_malformed() {
        assert!(matches!(
            ControlId::parse("AC-99999999999"),
            Err(SspError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        for text in ["", "   ", "\t\n"] {
            match ControlId::parse(text) {
                Err(SspError::MalformedIdentifier { input }) => assert_eq!(input, text),
                other => panic!("expected MalformedIdentifier for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_garbage_rejected() {
        for text in ["A-2", "ACC-2", "AC-", "AC-2(", "AC-2)1(", "AC--2", "AC-0", "12-3", "AC-x"] {
            assert!(ControlId::parse(text).is_err(), "{text:?} should be malformed");
        }
    }

    #[test]
    fn test_zero_enhancement_allowed() {
        assert_eq!(id("AC-2(0)").enhancement(), Some(0));
    }

    #[test]
    fn test_render_forms() {
        let enh = id("ac-2(1)");
        assert_eq!(enh.render(RenderForm::Dotted), "AC.2.1");
        assert_eq!(enh.render(RenderForm::Hyphenated), "AC-2(1)");
        assert_eq!(enh.to_oscal(), "ac-2.1");

        let base = id("ac 2");
        assert_eq!(base.render(RenderForm::Dotted), "AC.2");
        assert_eq!(base.render(RenderForm::Hyphenated), "AC-2");
        assert_eq!(base.to_oscal(), "ac-2");
    }

    #[test]
    fn test_numeric_ordering_not_lexical() {
        let mut ids = vec![id("AC-10(1)"), id("AC-10"), id("AC-9"), id("AC-1")];
        ids.sort();
        let rendered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["AC-1", "AC-9", "AC-10", "AC-10(1)"]);
    }

    #[test]
    fn test_absent_enhancement_sorts_first() {
        assert_eq!(ControlId::compare(&id("AC-2"), &id("AC-2(0)")), Ordering::Less);
        assert_eq!(ControlId::compare(&id("AC-2(1)"), &id("AC-2")), Ordering::Greater);
        assert_eq!(ControlId::compare(&id("AC.2.1"), &id("ac-2(1)")), Ordering::Equal);
    }

    #[test]
    fn test_family_orders_before_number() {
        assert!(id("AC-99") < id("AT-1"));
    }

    #[test]
    fn test_base() {
        assert_eq!(id("SI-4(2)").base(), id("SI-4"));
        assert!(!id("SI-4").is_enhancement());
    }

    #[test]
    fn test_new_validates() {
        assert!(ControlId::new("A", 1, None).is_err());
        assert!(ControlId::new("A1", 1, None).is_err());
        assert!(ControlId::new("AC", 0, None).is_err());
        assert_eq!(ControlId::new("ac", 3, None).unwrap().family(), "AC");
    }

    #[test]
    fn test_serde_uses_hyphenated_form() {
        let json = serde_json::to_string(&id("ac.2.1")).unwrap();
        assert_eq!(json, "\"AC-2(1)\"");
        let back: ControlId = serde_json::from_str("\"ac 2 (1)\"").unwrap();
        assert_eq!(back, id("AC-2(1)"));
        assert!(serde_json::from_str::<ControlId>("\"nope\"").is_err());
    }

    #[test]
    fn test_from_str() {
        let parsed: ControlId = "IA-2(12)".parse().unwrap();
        assert_eq!(parsed.enhancement(), Some(12));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn control_id() -> impl Strategy<Value = ControlId> {
        ("[A-Z]{2}", 1u32..5000, proptest::option::of(0u32..200)).prop_map(|(f, n, e)| {
            ControlId {
                family: f,
                number: n,
                enhancement: e,
            }
        })
    }

    fn as_tuple(id: &ControlId) -> (String, u32, Option<u32>) {
        (id.family.clone(), id.number, id.enhancement)
    }

    proptest! {
        /// Both canonical renderings parse back to the same value.
        #[test]
        fn render_parse_roundtrip(id in control_id()) {
            let dotted = ControlId::parse(&id.render(RenderForm::Dotted)).unwrap();
            let hyphen = ControlId::parse(&id.render(RenderForm::Hyphenated)).unwrap();
            let oscal = ControlId::parse(&id.to_oscal()).unwrap();
            prop_assert_eq!(&dotted, &id);
            prop_assert_eq!(&hyphen, &id);
            prop_assert_eq!(&oscal, &id);
        }

        /// Rendering a parsed identifier in the form it was written in yields
        /// the canonical spelling of that form.
        #[test]
        fn parse_render_canonicalizes(id in control_id()) {
            let lower = id.render(RenderForm::Hyphenated).to_ascii_lowercase();
            let parsed = ControlId::parse(&lower).unwrap();
            prop_assert_eq!(parsed.render(RenderForm::Hyphenated), id.render(RenderForm::Hyphenated));
        }

        /// `compare` agrees with (family, number, enhancement) tuple order,
        /// where `None < Some(_)`.
        #[test]
        fn compare_matches_tuple_order(a in control_id(), b in control_id()) {
            prop_assert_eq!(ControlId::compare(&a, &b), as_tuple(&a).cmp(&as_tuple(&b)));
        }

        #[test]
        fn compare_is_antisymmetric(a in control_id(), b in control_id()) {
            prop_assert_eq!(ControlId::compare(&a, &b), ControlId::compare(&b, &a).reverse());
        }

        #[test]
        fn compare_is_transitive(a in control_id(), b in control_id(), c in control_id()) {
            let mut v = [a, b, c];
            v.sort();
            prop_assert!(v[0] <= v[1] && v[1] <= v[2] && v[0] <= v[2]);
        }

        #[test]
        fn equal_iff_compare_equal(a in control_id(), b in control_id()) {
            prop_assert_eq!(a == b, ControlId::compare(&a, &b) == Ordering::Equal);
        }
    }
}
