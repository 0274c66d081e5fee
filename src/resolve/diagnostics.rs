//! Resolution diagnostics for human review.
//!
//! The report exists so a maintainer can see how a source matched and
//! extend the alias table when coverage drops; it is not meant for
//! automated consumption.

use std::fmt;

use serde::Serialize;

use crate::resolve::ConfidenceTier;

/// Counts per confidence tier plus the literal labels that failed to match
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ResolutionDiagnostics {
    /// Exact matches (normalized or raw name)
    pub exact: usize,
    /// Matches through alias-table redirection
    pub alias: usize,
    /// Substring and token containment matches
    pub substring: usize,
    /// Similarity-ratio matches
    pub fuzzy: usize,
    /// Coarse-granularity rows split by the disaggregator
    pub disaggregated: usize,
    /// Rows dropped because no strategy matched
    pub unresolved: usize,
    /// The unmatched labels, verbatim, for alias-table maintenance
    pub unresolved_labels: Vec<String>,
}

impl ResolutionDiagnostics {
    /// Count a resolution at the given tier
    pub fn record_tier(&mut self, tier: ConfidenceTier) {
        match tier {
            ConfidenceTier::Exact => self.exact += 1,
            ConfidenceTier::Alias => self.alias += 1,
            ConfidenceTier::Substring => self.substring += 1,
            ConfidenceTier::Fuzzy => self.fuzzy += 1,
        }
    }

    /// Count a disaggregated coarse-granularity row
    pub fn record_disaggregated(&mut self) {
        self.disaggregated += 1;
    }

    /// Count an unresolved label and keep it verbatim for review
    pub fn record_unresolved(&mut self, raw_label: &str) {
        self.unresolved += 1;
        self.unresolved_labels.push(raw_label.to_string());
    }

    /// Rows that produced output, at any tier
    #[must_use]
    pub fn resolved_total(&self) -> usize {
        self.exact + self.alias + self.substring + self.fuzzy + self.disaggregated
    }

    /// All rows seen
    #[must_use]
    pub fn total(&self) -> usize {
        self.resolved_total() + self.unresolved
    }

    /// Share of rows that produced output, as a percentage. An empty report
    /// counts as complete.
    #[must_use]
    pub fn completeness(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            100.0
        } else {
            self.resolved_total() as f64 / total as f64 * 100.0
        }
    }

    /// The report as a JSON value, for dropping into run summaries
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Fold another report into this one
    pub fn merge(&mut self, other: &Self) {
        self.exact += other.exact;
        self.alias += other.alias;
        self.substring += other.substring;
        self.fuzzy += other.fuzzy;
        self.disaggregated += other.disaggregated;
        self.unresolved += other.unresolved;
        self.unresolved_labels
            .extend(other.unresolved_labels.iter().cloned());
    }
}

impl fmt::Display for ResolutionDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "resolution: {} exact, {} alias, {} substring, {} fuzzy, {} disaggregated, {} unresolved ({:.1}% complete)",
            self.exact,
            self.alias,
            self.substring,
            self.fuzzy,
            self.disaggregated,
            self.unresolved,
            self.completeness()
        )?;
        for label in &self.unresolved_labels {
            writeln!(f, "  unresolved: {label:?}")?;
        }
        Ok(())
    }
}
