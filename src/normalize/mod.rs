//! Canonicalization of free-text territory labels.
//!
//! Every source spells territory names its own way: leading list indices
//! ("1. el Raval"), statistical-zone suffixes ("la Marina del Prat Vermell -
//! AEI Zona Franca"), footnote markers ("(1)"), inconsistent accents and
//! elided articles. This module folds all of that into a single comparable
//! key so the resolver can match labels across sources.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

pub mod aliases;

pub use aliases::AliasTable;

/// Normalizes raw territory labels into canonical comparable keys.
///
/// Construct once and share by reference: the regex set is compiled at
/// construction and every call after that is pure and allocation-light.
#[derive(Debug)]
pub struct LabelNormalizer {
    /// Leading list-position artifact, e.g. "1. " or "03, "
    leading_index: Regex,
    /// Trailing administrative-classification suffix one source appends to
    /// special statistical zones, e.g. " - AEI Zona Franca"
    admin_suffix: Regex,
    /// Trailing parenthesized footnote markers, e.g. " (1)"
    footnote: Regex,
    aliases: AliasTable,
}

impl LabelNormalizer {
    /// Build a normalizer with the built-in alias table
    #[must_use]
    pub fn new() -> Self {
        Self::with_aliases(AliasTable::new())
    }

    /// Build a normalizer with a caller-supplied alias table
    #[must_use]
    pub fn with_aliases(aliases: AliasTable) -> Self {
        Self {
            leading_index: Regex::new(r"^\d+\s*[.,]\s*").unwrap(),
            admin_suffix: Regex::new(r"(?i)\s*-\s*aei\b.*$").unwrap(),
            footnote: Regex::new(r"(?:\s*\(\d+\))+\s*$").unwrap(),
            aliases,
        }
    }

    /// Canonicalize a raw territory label.
    ///
    /// Total and pure: never panics, and unknown or empty input yields the
    /// empty string. Idempotent: `normalize(normalize(x)) == normalize(x)`,
    /// because the folded output already satisfies the character class the
    /// stripping steps operate on and every alias-table value is itself a
    /// fixed point.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let folded = self.fold(raw);
        match self.aliases.resolve_alias(&folded) {
            Some(canonical) => canonical.to_string(),
            None => folded,
        }
    }

    /// Canonicalize without alias substitution.
    ///
    /// The resolver uses this to distinguish an exact match from an
    /// alias-redirected one when reporting confidence tiers.
    #[must_use]
    pub fn fold(&self, raw: &str) -> String {
        // Order matters: the stripping patterns anchor on punctuation that
        // the character filter below removes.
        let s = raw.trim();
        let s = self.leading_index.replace(s, "");
        let s = self.admin_suffix.replace(&s, "");
        let s = self.footnote.replace(&s, "");
        s.to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect()
    }

    /// Look up the canonical form for an already-normalized key
    #[must_use]
    pub fn resolve_alias(&self, key: &str) -> Option<&'static str> {
        self.aliases.resolve_alias(key)
    }

    /// The alias table backing this normalizer
    #[must_use]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }
}

impl Default for LabelNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
