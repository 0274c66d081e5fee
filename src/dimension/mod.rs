//! The canonical neighborhood dimension.
//!
//! Built once per run from the most authoritative demographic source and
//! held read-only afterwards; every resolver lookup goes through the
//! indexes constructed here.

use arrow::record_batch::RecordBatch;
use log::info;
use rustc_hash::FxHashMap;

use crate::error::{ReconcileError, Result};
use crate::frame::columns;
use crate::normalize::LabelNormalizer;

/// Declared column roles for the dimension source extract
#[derive(Debug, Clone)]
pub struct DimensionSchema {
    /// Column carrying the stable neighborhood id
    pub id_column: String,
    /// Column carrying the canonical neighborhood name
    pub name_column: String,
    /// Column carrying the district id
    pub district_id_column: String,
    /// Column carrying the district name
    pub district_name_column: String,
    /// Optional column carrying a serialized geometry
    pub geometry_column: Option<String>,
}

impl Default for DimensionSchema {
    /// Column headers used by the authoritative demographic source
    fn default() -> Self {
        Self {
            id_column: "codi_barri".to_string(),
            name_column: "nom_barri".to_string(),
            district_id_column: "codi_districte".to_string(),
            district_name_column: "nom_districte".to_string(),
            geometry_column: None,
        }
    }
}

/// One canonical neighborhood
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborhoodEntry {
    /// Stable, externally assigned id. Immutable once assigned.
    pub neighborhood_id: i64,
    /// Name exactly as the authoritative source publishes it
    pub raw_name: String,
    /// Output of the normalizer for `raw_name`; unique within the dimension
    pub normalized_name: String,
    /// Id of the district this neighborhood belongs to
    pub district_id: i64,
    /// Name of the district this neighborhood belongs to
    pub district_name: String,
    /// Serialized geometry, when the source carries one
    pub geometry: Option<String>,
}

/// The canonical reference set of neighborhoods, indexed for resolution
#[derive(Debug)]
pub struct NeighborhoodDimension {
    entries: Vec<NeighborhoodEntry>,
    by_normalized: FxHashMap<String, usize>,
    /// normalized district name -> district id
    district_by_name: FxHashMap<String, i64>,
    /// district id -> member neighborhood ids
    district_members: FxHashMap<i64, Vec<i64>>,
}

impl NeighborhoodDimension {
    /// Build the dimension from already-constructed entries.
    ///
    /// # Errors
    /// Fails with `DimensionConflict` if two entries share a normalized name.
    pub fn from_entries(
        entries: Vec<NeighborhoodEntry>,
        normalizer: &LabelNormalizer,
    ) -> Result<Self> {
        let mut by_normalized = FxHashMap::default();
        let mut district_by_name = FxHashMap::default();
        let mut district_members: FxHashMap<i64, Vec<i64>> = FxHashMap::default();

        for (index, entry) in entries.iter().enumerate() {
            if by_normalized
                .insert(entry.normalized_name.clone(), index)
                .is_some()
            {
                return Err(ReconcileError::DimensionConflict {
                    normalized_name: entry.normalized_name.clone(),
                });
            }
            district_by_name.insert(normalizer.normalize(&entry.district_name), entry.district_id);
            district_members
                .entry(entry.district_id)
                .or_default()
                .push(entry.neighborhood_id);
        }

        info!(
            "built neighborhood dimension: {} neighborhoods across {} districts",
            entries.len(),
            district_members.len()
        );

        Ok(Self {
            entries,
            by_normalized,
            district_by_name,
            district_members,
        })
    }

    /// Build the dimension from the authoritative demographic extract.
    ///
    /// # Errors
    /// Fails with `SchemaViolation` if a declared column is absent, and with
    /// `DimensionConflict` if two rows collapse onto one normalized name.
    pub fn from_batch(
        batch: &RecordBatch,
        schema: &DimensionSchema,
        normalizer: &LabelNormalizer,
    ) -> Result<Self> {
        const DATASET: &str = "neighborhood-dimension";

        let id = columns::required_column(batch, &schema.id_column, DATASET)?;
        let name = columns::required_column(batch, &schema.name_column, DATASET)?;
        let district_id = columns::required_column(batch, &schema.district_id_column, DATASET)?;
        let district_name = columns::required_column(batch, &schema.district_name_column, DATASET)?;
        let geometry = match &schema.geometry_column {
            Some(column) => Some(columns::required_column(batch, column, DATASET)?),
            None => None,
        };

        let mut entries = Vec::with_capacity(batch.num_rows());
        for row in 0..batch.num_rows() {
            let (Some(neighborhood_id), Some(raw_name)) =
                (columns::id_value(id, row), columns::string_value(name, row))
            else {
                return Err(ReconcileError::SchemaViolation {
                    dataset_id: DATASET.to_string(),
                    message: format!("row {row} has a null id or name"),
                });
            };
            entries.push(NeighborhoodEntry {
                normalized_name: normalizer.normalize(&raw_name),
                raw_name,
                neighborhood_id,
                district_id: columns::id_value(district_id, row).unwrap_or_default(),
                district_name: columns::string_value(district_name, row).unwrap_or_default(),
                geometry: geometry.and_then(|col| columns::string_value(col, row)),
            });
        }
        Self::from_entries(entries, normalizer)
    }

    /// Look up an entry by its normalized name
    #[must_use]
    pub fn by_normalized(&self, normalized_name: &str) -> Option<&NeighborhoodEntry> {
        self.by_normalized
            .get(normalized_name)
            .map(|&index| &self.entries[index])
    }

    /// Look up an entry whose raw name equals the label, ignoring case.
    ///
    /// Covers sources that preserve the canonical spelling exactly in cases
    /// where the normalizer's stripping rules would interfere.
    #[must_use]
    pub fn by_raw_case_insensitive(&self, label: &str) -> Option<&NeighborhoodEntry> {
        let wanted = label.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.raw_name.to_lowercase() == wanted)
    }

    /// Member neighborhood ids of a district, looked up by normalized name
    #[must_use]
    pub fn district_members(&self, normalized_district_name: &str) -> Option<&[i64]> {
        self.district_by_name
            .get(normalized_district_name)
            .and_then(|district_id| self.district_members.get(district_id))
            .map(Vec::as_slice)
    }

    /// Normalized district names known to the dimension
    pub fn district_names(&self) -> impl Iterator<Item = &str> {
        self.district_by_name.keys().map(String::as_str)
    }

    /// Every neighborhood id in the dimension
    #[must_use]
    pub fn all_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.neighborhood_id).collect()
    }

    /// Entries in insertion order
    #[must_use]
    pub fn entries(&self) -> &[NeighborhoodEntry] {
        &self.entries
    }

    /// Number of neighborhoods in the dimension
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the dimension is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
