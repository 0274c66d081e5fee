//! End-to-end reconciliation of raw extract frames into merged facts.
//!
//! One pipeline invocation turns one snapshot of raw extracts into one fact
//! table per metric. Each metric is independent of every other, so metrics
//! are processed in parallel; within a metric the pass is sequential and
//! bounded by the size of a single record batch.

use arrow::record_batch::RecordBatch;
use chrono::Utc;
use log::{error, warn};
use rayon::prelude::*;

use crate::config::ResolverConfig;
use crate::dimension::NeighborhoodDimension;
use crate::disaggregate::{PopulationLookup, disaggregate};
use crate::error::Result;
use crate::frame::{SourceSchema, extract_observations};
use crate::merge::{FactObservation, MergedFact, merge_frames};
use crate::normalize::LabelNormalizer;
use crate::resolve::{ResolutionDiagnostics, ResolutionResult, TerritoryResolver};

/// One source dataset's extract: its declared schema plus its record batches
#[derive(Debug, Clone)]
pub struct SourceFrame {
    /// Declared column roles and provenance for this dataset
    pub schema: SourceSchema,
    /// The extract, chunked into record batches
    pub batches: Vec<RecordBatch>,
}

/// Result of processing one source frame
#[derive(Debug, Clone)]
pub struct FrameOutcome {
    /// Resolved and disaggregated fact rows, provenance stamped
    pub observations: Vec<FactObservation>,
    /// How the frame's labels resolved
    pub diagnostics: ResolutionDiagnostics,
}

/// Result of reconciling one metric across all of its sources
#[derive(Debug, Clone)]
pub struct MetricOutcome {
    /// The merged, deduplicated fact table, ready for bulk load
    pub facts: Vec<MergedFact>,
    /// Combined resolution diagnostics across contributing frames
    pub diagnostics: ResolutionDiagnostics,
    /// Dataset ids of frames rejected for schema violations
    pub failed_frames: Vec<String>,
}

/// Batch reconciliation engine: resolution, disaggregation, merge.
///
/// Holds every collaborator by reference; nothing here is mutated after
/// construction, so one pipeline can serve all metrics of a run.
pub struct ReconcilePipeline<'a> {
    resolver: TerritoryResolver<'a>,
    population: Option<&'a dyn PopulationLookup>,
}

impl<'a> ReconcilePipeline<'a> {
    /// Create a pipeline over a dimension with the given resolver tunables
    #[must_use]
    pub fn new(
        dimension: &'a NeighborhoodDimension,
        normalizer: &'a LabelNormalizer,
        config: ResolverConfig,
    ) -> Self {
        Self {
            resolver: TerritoryResolver::new(dimension, normalizer, config),
            population: None,
        }
    }

    /// Attach a population lookup for weighted disaggregation.
    ///
    /// Without one, coarse observations are split uniformly.
    #[must_use]
    pub fn with_population(mut self, population: &'a dyn PopulationLookup) -> Self {
        self.population = Some(population);
        self
    }

    /// Resolve one source frame into provenance-stamped fact observations.
    ///
    /// Unresolved labels are dropped with a warning naming the label; empty
    /// disaggregation candidate sets are skipped the same way. Both are
    /// visible in the returned diagnostics.
    ///
    /// # Errors
    /// Fails with `SchemaViolation` when the frame does not match its
    /// declared schema.
    pub fn process_frame(&self, frame: &SourceFrame) -> Result<FrameOutcome> {
        let schema = &frame.schema;
        let loaded_at = Utc::now();
        let mut observations = Vec::new();
        let mut diagnostics = ResolutionDiagnostics::default();

        for batch in &frame.batches {
            for row in extract_observations(batch, schema)? {
                match self.resolver.resolve(&row.raw_label, schema.granularity) {
                    ResolutionResult::Resolved {
                        neighborhood_id,
                        tier,
                    } => {
                        diagnostics.record_tier(tier);
                        observations.push(FactObservation {
                            neighborhood_id,
                            year: row.year,
                            period_qualifier: row.period_qualifier,
                            metric_value: Some(row.value),
                            dataset_id: schema.dataset_id.clone(),
                            source: schema.source.clone(),
                            loaded_at,
                        });
                    }
                    ResolutionResult::Unresolved { reason } => {
                        warn!(
                            "dataset '{}': dropping row with unresolved territory label '{}': {reason}",
                            schema.dataset_id, row.raw_label
                        );
                        diagnostics.record_unresolved(&row.raw_label);
                    }
                    ResolutionResult::RequiresDisaggregation { candidates } => {
                        if candidates.is_empty() {
                            warn!(
                                "dataset '{}': no neighborhoods found for {} label '{}'; skipping",
                                schema.dataset_id,
                                schema.granularity.as_str(),
                                row.raw_label
                            );
                            diagnostics.record_unresolved(&row.raw_label);
                            continue;
                        }
                        match disaggregate(row.value, &candidates, row.year, self.population) {
                            Ok(allocations) => {
                                diagnostics.record_disaggregated();
                                for allocation in allocations {
                                    observations.push(FactObservation {
                                        neighborhood_id: allocation.neighborhood_id,
                                        year: row.year,
                                        period_qualifier: row.period_qualifier.clone(),
                                        metric_value: Some(allocation.value),
                                        dataset_id: schema.dataset_id.clone(),
                                        source: schema.source.clone(),
                                        loaded_at,
                                    });
                                }
                            }
                            Err(err) => {
                                warn!(
                                    "dataset '{}': skipping '{}': {err}",
                                    schema.dataset_id, row.raw_label
                                );
                                diagnostics.record_unresolved(&row.raw_label);
                            }
                        }
                    }
                }
            }
        }

        Ok(FrameOutcome {
            observations,
            diagnostics,
        })
    }

    /// Reconcile every source frame of one logical metric.
    ///
    /// A structurally malformed frame aborts only that frame: it is logged
    /// at error level and listed in the outcome, and the remaining frames
    /// still contribute.
    #[must_use]
    pub fn reconcile_metric(&self, frames: &[SourceFrame]) -> MetricOutcome {
        let mut per_frame = Vec::with_capacity(frames.len());
        let mut diagnostics = ResolutionDiagnostics::default();
        let mut failed_frames = Vec::new();

        for frame in frames {
            match self.process_frame(frame) {
                Ok(outcome) => {
                    diagnostics.merge(&outcome.diagnostics);
                    per_frame.push(outcome.observations);
                }
                Err(err) => {
                    error!(
                        "dataset '{}': frame rejected: {err}",
                        frame.schema.dataset_id
                    );
                    failed_frames.push(frame.schema.dataset_id.clone());
                }
            }
        }

        MetricOutcome {
            facts: merge_frames(per_frame),
            diagnostics,
            failed_frames,
        }
    }

    /// Reconcile several metrics in parallel.
    ///
    /// Metrics are embarrassingly parallel: nothing is shared but the
    /// read-only dimension and lookups.
    #[must_use]
    pub fn reconcile_metrics(
        &self,
        metrics: &[(String, Vec<SourceFrame>)],
    ) -> Vec<(String, MetricOutcome)> {
        metrics
            .par_iter()
            .map(|(metric, frames)| (metric.clone(), self.reconcile_metric(frames)))
            .collect()
    }
}
