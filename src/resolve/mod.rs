//! Territory resolution: raw labels to canonical neighborhood identities.
//!
//! Resolution tries progressively looser strategies and records which one
//! succeeded, so a downstream reviewer can audit how much of a source
//! matched exactly and how much leaned on fuzzy acceptance.

use log::info;
use smallvec::SmallVec;
use strsim::normalized_levenshtein;

use crate::config::ResolverConfig;
use crate::dimension::NeighborhoodDimension;
use crate::normalize::LabelNormalizer;

pub mod diagnostics;

pub use diagnostics::ResolutionDiagnostics;

/// Administrative granularity a territory label is published at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// The finest level; labels resolve to a single neighborhood
    Neighborhood,
    /// One level above neighborhood; values must be disaggregated
    District,
    /// The whole municipality; values spread over the entire dimension
    Municipality,
}

impl Granularity {
    /// Static string form, for logs and reports
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neighborhood => "neighborhood",
            Self::District => "district",
            Self::Municipality => "municipality",
        }
    }
}

impl From<&str> for Granularity {
    /// Map the granularity tags the sources use onto the canonical levels.
    /// Unrecognized tags default to neighborhood, the pass-through level.
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "district" | "districte" | "distrito" => Self::District,
            "municipality" | "municipi" | "municipio" | "city" => Self::Municipality,
            _ => Self::Neighborhood,
        }
    }
}

/// Which matching strategy produced a resolution.
///
/// Retained for observability; any tier is accepted downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceTier {
    /// Exact match on the normalized or raw name
    Exact,
    /// Matched after alias-table redirection
    Alias,
    /// Substring or token containment match
    Substring,
    /// Similarity-ratio match above the configured threshold
    Fuzzy,
}

impl ConfidenceTier {
    /// Static string form, for logs and reports
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Substring => "substring",
            Self::Fuzzy => "fuzzy",
        }
    }
}

/// Outcome of resolving one territory label
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
    /// The label names exactly one canonical neighborhood
    Resolved {
        /// Canonical id from the dimension
        neighborhood_id: i64,
        /// Strategy that produced the match
        tier: ConfidenceTier,
    },
    /// No strategy produced a match; the row is dropped with a warning
    Unresolved {
        /// Why resolution failed
        reason: String,
    },
    /// The label is above neighborhood granularity; the value must be
    /// split across these candidates by the disaggregator
    RequiresDisaggregation {
        /// Member neighborhoods of the named territory. May be empty when
        /// the coarse label itself did not match, which the caller skips
        /// with a warning.
        candidates: Vec<i64>,
    },
}

/// Resolves raw territory labels against the canonical dimension.
///
/// Holds the dimension and the normalizer by reference; both are read-only
/// for the lifetime of a run.
#[derive(Debug)]
pub struct TerritoryResolver<'a> {
    dimension: &'a NeighborhoodDimension,
    normalizer: &'a LabelNormalizer,
    config: ResolverConfig,
}

impl<'a> TerritoryResolver<'a> {
    /// Create a resolver over a dimension with the given tunables
    #[must_use]
    pub fn new(
        dimension: &'a NeighborhoodDimension,
        normalizer: &'a LabelNormalizer,
        config: ResolverConfig,
    ) -> Self {
        Self {
            dimension,
            normalizer,
            config,
        }
    }

    /// Resolve a raw label published at the given granularity.
    ///
    /// Neighborhood labels go through the tiered matching strategies;
    /// district and municipality labels are never collapsed onto a single
    /// "representative" neighborhood, they come back as disaggregation
    /// requests naming every member neighborhood.
    #[must_use]
    pub fn resolve(&self, raw_label: &str, granularity: Granularity) -> ResolutionResult {
        match granularity {
            Granularity::Neighborhood => self.resolve_neighborhood(raw_label),
            Granularity::District => ResolutionResult::RequiresDisaggregation {
                candidates: self.district_candidates(raw_label),
            },
            Granularity::Municipality => ResolutionResult::RequiresDisaggregation {
                candidates: self.dimension.all_ids(),
            },
        }
    }

    fn resolve_neighborhood(&self, raw_label: &str) -> ResolutionResult {
        let folded = self.normalizer.fold(raw_label);
        if folded.is_empty() {
            return ResolutionResult::Unresolved {
                reason: "label is empty after normalization".to_string(),
            };
        }

        // Tier 1: exact match on the normalized name
        if let Some(entry) = self.dimension.by_normalized(&folded) {
            return ResolutionResult::Resolved {
                neighborhood_id: entry.neighborhood_id,
                tier: ConfidenceTier::Exact,
            };
        }

        // Tier 2: alias redirection, then exact
        if let Some(canonical) = self.normalizer.resolve_alias(&folded)
            && let Some(entry) = self.dimension.by_normalized(canonical)
        {
            return ResolutionResult::Resolved {
                neighborhood_id: entry.neighborhood_id,
                tier: ConfidenceTier::Alias,
            };
        }

        // Tier 3: case-insensitive exact match on the raw name
        if let Some(entry) = self.dimension.by_raw_case_insensitive(raw_label) {
            return ResolutionResult::Resolved {
                neighborhood_id: entry.neighborhood_id,
                tier: ConfidenceTier::Exact,
            };
        }

        // Tier 4: substring containment against raw names. Ties prefer the
        // shortest containing name, so a short query cannot be captured by a
        // compound name when a closer match exists.
        let needle = raw_label.trim().to_lowercase();
        if let Some(entry) = self
            .dimension
            .entries()
            .iter()
            .filter(|entry| entry.raw_name.to_lowercase().contains(&needle))
            .min_by_key(|entry| entry.raw_name.len())
        {
            return ResolutionResult::Resolved {
                neighborhood_id: entry.neighborhood_id,
                tier: ConfidenceTier::Substring,
            };
        }

        // Tier 5: token containment. Tokens come from the original label
        // because normalization has already removed the word boundaries;
        // short tokens are skipped so connector words cannot match.
        let tokens: SmallVec<[String; 8]> = raw_label
            .split_whitespace()
            .map(|token| self.normalizer.normalize(token))
            .filter(|token| token.len() > self.config.min_token_len)
            .collect();
        for token in &tokens {
            if let Some(entry) = self
                .dimension
                .entries()
                .iter()
                .find(|entry| entry.normalized_name.contains(token.as_str()))
            {
                return ResolutionResult::Resolved {
                    neighborhood_id: entry.neighborhood_id,
                    tier: ConfidenceTier::Substring,
                };
            }
        }

        // Tier 6: fuzzy. Accepted matches are a silent-correctness risk, so
        // every acceptance is logged.
        let best = self
            .dimension
            .entries()
            .iter()
            .map(|entry| (normalized_levenshtein(&folded, &entry.normalized_name), entry))
            .max_by(|(a, _), (b, _)| a.total_cmp(b));
        if let Some((similarity, entry)) = best
            && similarity >= self.config.fuzzy_threshold
        {
            info!(
                "fuzzy-matched territory label '{raw_label}' to '{}' (similarity {similarity:.3})",
                entry.raw_name
            );
            return ResolutionResult::Resolved {
                neighborhood_id: entry.neighborhood_id,
                tier: ConfidenceTier::Fuzzy,
            };
        }

        ResolutionResult::Unresolved {
            reason: "no match".to_string(),
        }
    }

    /// Member neighborhoods of the district the label names.
    ///
    /// District labels get the same exact/alias/fuzzy treatment as
    /// neighborhood labels, against the dimension's district names.
    fn district_candidates(&self, raw_label: &str) -> Vec<i64> {
        let key = self.normalizer.normalize(raw_label);
        if let Some(members) = self.dimension.district_members(&key) {
            return members.to_vec();
        }

        let best = self
            .dimension
            .district_names()
            .map(|name| (normalized_levenshtein(&key, name), name))
            .max_by(|(a, _), (b, _)| a.total_cmp(b));
        if let Some((similarity, name)) = best
            && similarity >= self.config.fuzzy_threshold
        {
            info!(
                "fuzzy-matched district label '{raw_label}' to '{name}' (similarity {similarity:.3})"
            );
            if let Some(members) = self.dimension.district_members(name) {
                return members.to_vec();
            }
        }
        Vec::new()
    }
}
