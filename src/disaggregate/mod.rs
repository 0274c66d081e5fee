//! Population-weighted disaggregation of coarse observations.
//!
//! A value published at district or municipality level is split across the
//! member neighborhoods in proportion to their population. The weight
//! source degrades tier by tier, down to uniform weights when no population
//! signal exists, so the allocation is always well-defined and always sums
//! back to the original value.

use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::error::{ReconcileError, Result};
use crate::frame::columns;

/// Per-neighborhood population figures, the weighting signal for
/// disaggregation.
///
/// Absence of this collaborator degrades disaggregation to uniform
/// weighting; it never fails a run.
pub trait PopulationLookup: Send + Sync {
    /// Population of a neighborhood in a specific year, if known
    fn population(&self, neighborhood_id: i64, year: i32) -> Option<f64>;

    /// Mean population of a neighborhood across all known years, if any
    fn mean_population(&self, neighborhood_id: i64) -> Option<f64>;
}

/// `FxHashMap`-backed population lookup
#[derive(Debug, Default, Clone)]
pub struct PopulationTable {
    by_year: FxHashMap<(i64, i32), f64>,
    /// per-neighborhood running (sum, count) for the mean fallback
    totals: FxHashMap<i64, (f64, usize)>,
}

impl PopulationTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the population of a neighborhood for one year
    pub fn insert(&mut self, neighborhood_id: i64, year: i32, population: f64) {
        self.by_year.insert((neighborhood_id, year), population);
        let (sum, count) = self.totals.entry(neighborhood_id).or_insert((0.0, 0));
        *sum += population;
        *count += 1;
    }

    /// Build the table from a population extract.
    ///
    /// # Errors
    /// Fails with `SchemaViolation` if a named column is absent.
    pub fn from_batch(
        batch: &RecordBatch,
        id_column: &str,
        year_column: &str,
        population_column: &str,
    ) -> Result<Self> {
        const DATASET: &str = "population-lookup";

        let id = columns::required_column(batch, id_column, DATASET)?;
        let year = columns::required_column(batch, year_column, DATASET)?;
        let population = columns::required_column(batch, population_column, DATASET)?;

        let mut table = Self::new();
        for row in 0..batch.num_rows() {
            if let (Some(id), Some(year), Some(population)) = (
                columns::id_value(id, row),
                columns::year_value(year, row),
                columns::numeric_value(population, row),
            ) {
                table.insert(id, year, population);
            }
        }
        Ok(table)
    }
}

impl PopulationLookup for PopulationTable {
    fn population(&self, neighborhood_id: i64, year: i32) -> Option<f64> {
        self.by_year.get(&(neighborhood_id, year)).copied()
    }

    fn mean_population(&self, neighborhood_id: i64) -> Option<f64> {
        self.totals
            .get(&neighborhood_id)
            .map(|(sum, count)| sum / *count as f64)
    }
}

/// One neighborhood's share of a disaggregated value
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Canonical neighborhood id
    pub neighborhood_id: i64,
    /// The share of the original value allocated to this neighborhood
    pub value: f64,
}

/// Split a coarse value across candidate neighborhoods by population share.
///
/// Weight priority per candidate: population for the observation year, else
/// the mean population across known years, else no signal. If no candidate
/// carries a signal (or every signal is zero), weights fall back to uniform
/// so the split never divides by zero. The allocations always sum to the
/// original value up to floating-point tolerance.
///
/// # Errors
/// Fails with `EmptyCandidateSet` when there is nothing to allocate to.
pub fn disaggregate(
    value: f64,
    candidates: &[i64],
    year: i32,
    population: Option<&dyn PopulationLookup>,
) -> Result<Vec<Allocation>> {
    if candidates.is_empty() {
        return Err(ReconcileError::EmptyCandidateSet);
    }

    let mut weights: Vec<f64> = candidates
        .iter()
        .map(|&id| {
            population
                .and_then(|lookup| {
                    lookup
                        .population(id, year)
                        .or_else(|| lookup.mean_population(id))
                })
                .filter(|w| w.is_finite() && *w > 0.0)
                .unwrap_or(0.0)
        })
        .collect();

    let mut total: f64 = weights.iter().sum();
    if total <= 0.0 {
        weights.fill(1.0);
        total = weights.len() as f64;
    }

    Ok(candidates
        .iter()
        .zip(&weights)
        .map(|(&neighborhood_id, weight)| Allocation {
            neighborhood_id,
            value: value * weight / total,
        })
        .collect())
}
