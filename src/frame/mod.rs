//! Typed ingestion boundary for raw extract frames.
//!
//! Each dataset declares up front which of its columns plays which semantic
//! role. Column roles are resolved against the frame exactly once, here,
//! instead of being re-guessed inside the transformation logic; a frame
//! whose shape does not match its declaration is rejected as a whole.

use arrow::record_batch::RecordBatch;
use log::debug;

use crate::error::Result;
use crate::resolve::Granularity;

pub mod columns;

/// Declared column roles for one source dataset
#[derive(Debug, Clone)]
pub struct SourceSchema {
    /// Identifier of the upstream dataset (provenance)
    pub dataset_id: String,
    /// Publisher of the dataset (provenance)
    pub source: String,
    /// Column carrying the territory label
    pub territory_column: String,
    /// Administrative granularity the territory labels are published at
    pub granularity: Granularity,
    /// Column carrying the metric value
    pub value_column: String,
    /// Column carrying the observation year
    pub year_column: String,
    /// Optional column carrying a sub-year period qualifier (e.g. quarter)
    pub period_column: Option<String>,
}

/// One input row's territorial claim plus its metric context, before
/// resolution. Transient: consumed entirely within the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryObservation {
    /// Territory label exactly as published
    pub raw_label: String,
    /// Observation year
    pub year: i32,
    /// Sub-year period qualifier, if the dataset has one
    pub period_qualifier: Option<String>,
    /// Observed metric value
    pub value: f64,
}

/// Extract the declared columns of a raw frame into territory observations.
///
/// Rows with a null label, year or value carry no usable information and are
/// skipped with a debug log; an absent column is a schema violation and
/// fails the whole frame.
pub fn extract_observations(
    batch: &RecordBatch,
    schema: &SourceSchema,
) -> Result<Vec<TerritoryObservation>> {
    let territory = columns::required_column(batch, &schema.territory_column, &schema.dataset_id)?;
    let value = columns::required_column(batch, &schema.value_column, &schema.dataset_id)?;
    let year = columns::required_column(batch, &schema.year_column, &schema.dataset_id)?;
    let period = match &schema.period_column {
        Some(name) => Some(columns::required_column(batch, name, &schema.dataset_id)?),
        None => None,
    };

    let mut observations = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let Some(raw_label) = columns::string_value(territory, row) else {
            debug!(
                "dataset '{}': skipping row {row} with null territory label",
                schema.dataset_id
            );
            continue;
        };
        let (Some(year), Some(value)) = (
            columns::year_value(year, row),
            columns::numeric_value(value, row),
        ) else {
            debug!(
                "dataset '{}': skipping row {row} ('{raw_label}') with null year or value",
                schema.dataset_id
            );
            continue;
        };
        let period_qualifier = period.and_then(|col| columns::string_value(col, row));
        observations.push(TerritoryObservation {
            raw_label,
            year,
            period_qualifier,
            value,
        });
    }
    Ok(observations)
}
