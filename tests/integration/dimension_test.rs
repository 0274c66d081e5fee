use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;

use barrio_facts::{
    DimensionSchema, LabelNormalizer, NeighborhoodDimension, NeighborhoodEntry, ReconcileError,
};

use crate::utils::init_logging;

fn dimension_batch(rows: &[(i64, &str, i64, &str)]) -> RecordBatch {
    let ids: Int64Array = rows.iter().map(|row| Some(row.0)).collect();
    let names: StringArray = rows.iter().map(|row| Some(row.1)).collect();
    let district_ids: Int64Array = rows.iter().map(|row| Some(row.2)).collect();
    let district_names: StringArray = rows.iter().map(|row| Some(row.3)).collect();
    RecordBatch::try_from_iter(vec![
        ("codi_barri", Arc::new(ids) as ArrayRef),
        ("nom_barri", Arc::new(names) as ArrayRef),
        ("codi_districte", Arc::new(district_ids) as ArrayRef),
        ("nom_districte", Arc::new(district_names) as ArrayRef),
    ])
    .expect("columns have equal length")
}

#[test]
fn builds_from_the_authoritative_extract() {
    init_logging();
    let normalizer = LabelNormalizer::new();
    let batch = dimension_batch(&[
        (1, "el Raval", 1, "Ciutat Vella"),
        (2, "el Barri Gòtic", 1, "Ciutat Vella"),
        (6, "la Sagrada Família", 2, "l'Eixample"),
    ]);

    let dimension =
        NeighborhoodDimension::from_batch(&batch, &DimensionSchema::default(), &normalizer)
            .unwrap();
    assert_eq!(dimension.len(), 3);

    let raval = dimension.by_normalized("elraval").unwrap();
    assert_eq!(raval.neighborhood_id, 1);
    assert_eq!(raval.raw_name, "el Raval");
    assert_eq!(raval.district_id, 1);
    assert_eq!(raval.district_name, "Ciutat Vella");
    assert!(raval.geometry.is_none());

    assert_eq!(dimension.district_members("ciutatvella"), Some(&[1, 2][..]));
}

#[test]
fn rejects_a_missing_column() {
    let normalizer = LabelNormalizer::new();
    let ids: Int64Array = vec![Some(1)].into_iter().collect();
    let batch =
        RecordBatch::try_from_iter(vec![("codi_barri", Arc::new(ids) as ArrayRef)]).unwrap();

    let result = NeighborhoodDimension::from_batch(&batch, &DimensionSchema::default(), &normalizer);
    assert!(matches!(
        result,
        Err(ReconcileError::SchemaViolation { .. })
    ));
}

#[test]
fn rejects_colliding_normalized_names() {
    let normalizer = LabelNormalizer::new();
    // Two spellings of the same neighborhood collapse onto one key
    let batch = dimension_batch(&[
        (1, "el Raval", 1, "Ciutat Vella"),
        (99, "El RAVAL", 1, "Ciutat Vella"),
    ]);

    let result = NeighborhoodDimension::from_batch(&batch, &DimensionSchema::default(), &normalizer);
    match result {
        Err(ReconcileError::DimensionConflict { normalized_name }) => {
            assert_eq!(normalized_name, "elraval");
        }
        other => panic!("expected a dimension conflict, got {other:?}"),
    }
}

#[test]
fn entries_round_trip_through_lookup_paths() {
    let normalizer = LabelNormalizer::new();
    let entries = vec![NeighborhoodEntry {
        neighborhood_id: 3,
        raw_name: "la Barceloneta".to_string(),
        normalized_name: normalizer.normalize("la Barceloneta"),
        district_id: 1,
        district_name: "Ciutat Vella".to_string(),
        geometry: Some("POINT (2.189 41.380)".to_string()),
    }];
    let dimension = NeighborhoodDimension::from_entries(entries, &normalizer).unwrap();

    assert!(!dimension.is_empty());
    assert_eq!(dimension.all_ids(), vec![3]);
    let entry = dimension.by_raw_case_insensitive("LA BARCELONETA").unwrap();
    assert_eq!(entry.neighborhood_id, 3);
    assert!(entry.geometry.is_some());
}
