//! Multi-source fact merging and deduplication.
//!
//! Independent pipelines produce fact rows for the same logical metric from
//! different datasets. Merging collapses literal re-ingestions of the same
//! dataset/source pair down to the most recently loaded row while keeping
//! every distinct source: two datasets reporting the same neighborhood-year
//! are corroborating evidence, not duplicates.

use chrono::{DateTime, Utc};
use itertools::Itertools;
use log::error;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// One metric value attributed to one neighborhood-year, with provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactObservation {
    /// Canonical neighborhood id
    pub neighborhood_id: i64,
    /// Observation year
    pub year: i32,
    /// Sub-year period qualifier (e.g. quarter), if any
    pub period_qualifier: Option<String>,
    /// The metric value; `None` rows carry no information
    pub metric_value: Option<f64>,
    /// Upstream dataset that produced this row
    pub dataset_id: String,
    /// Publisher of the dataset
    pub source: String,
    /// When this row was loaded by its pipeline
    pub loaded_at: DateTime<Utc>,
}

/// One surviving row per distinct
/// `(neighborhood_id, year, period_qualifier, dataset_id, source)` key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedFact {
    /// Canonical neighborhood id
    pub neighborhood_id: i64,
    /// Observation year
    pub year: i32,
    /// Sub-year period qualifier, if any
    pub period_qualifier: Option<String>,
    /// The metric value
    pub metric_value: Option<f64>,
    /// Duplicate-free "|"-joined dataset tag list
    pub dataset_id: String,
    /// Duplicate-free "|"-joined source tag list
    pub source: String,
    /// Load time of the surviving row
    pub loaded_at: DateTime<Utc>,
}

/// Normalize a provenance tag that may already be a "|"-joined list.
///
/// Splits on "|", drops repeated tags while preserving first-seen order and
/// rejoins. Returns the normalized value and whether repeats were removed;
/// a repeat indicates an upstream aggregation bug, which the caller logs
/// rather than silently fixing.
#[must_use]
pub fn normalize_tag(raw: &str) -> (String, bool) {
    let tags: Vec<&str> = raw
        .split('|')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect();
    let deduped: Vec<&str> = tags.iter().copied().unique().collect();
    let had_repeats = deduped.len() != tags.len();
    (deduped.iter().join("|"), had_repeats)
}

/// Merge per-dataset frames of the same logical metric.
///
/// Frames that are empty or entirely null carry no information and are
/// excluded up front so they cannot force an all-null output row.
#[must_use]
pub fn merge_frames(frames: Vec<Vec<FactObservation>>) -> Vec<MergedFact> {
    let observations = frames
        .into_iter()
        .filter(|frame| frame.iter().any(|row| row.metric_value.is_some()))
        .flatten()
        .collect();
    merge(observations)
}

/// Deduplicate fact observations into merged facts.
///
/// Rows are ordered by `(year, neighborhood_id, loaded_at descending)` and
/// deduplicated on the full provenance key, so a literal re-ingestion of the
/// same dataset/source keeps only the most recently loaded row while rows
/// from distinct datasets or sources all survive. Running the merge on its
/// own output is a no-op, and an empty input yields an empty output rather
/// than an error.
#[must_use]
pub fn merge(mut observations: Vec<FactObservation>) -> Vec<MergedFact> {
    observations.sort_by(|a, b| {
        a.year
            .cmp(&b.year)
            .then_with(|| a.neighborhood_id.cmp(&b.neighborhood_id))
            .then_with(|| b.loaded_at.cmp(&a.loaded_at))
    });

    let mut seen: FxHashSet<(i64, i32, Option<String>, String, String)> = FxHashSet::default();
    let mut merged = Vec::with_capacity(observations.len());
    for row in observations {
        let (dataset_id, dataset_repeats) = normalize_tag(&row.dataset_id);
        let (source, source_repeats) = normalize_tag(&row.source);
        if dataset_repeats || source_repeats {
            error!(
                "corrupt provenance tag on ({}, {}): dataset '{}', source '{}' contained repeated tags",
                row.neighborhood_id, row.year, row.dataset_id, row.source
            );
        }

        let key = (
            row.neighborhood_id,
            row.year,
            row.period_qualifier.clone(),
            dataset_id.clone(),
            source.clone(),
        );
        if seen.insert(key) {
            merged.push(MergedFact {
                neighborhood_id: row.neighborhood_id,
                year: row.year,
                period_qualifier: row.period_qualifier,
                metric_value: row.metric_value,
                dataset_id,
                source,
                loaded_at: row.loaded_at,
            });
        }
    }
    merged
}
