use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::record_batch::RecordBatch;

use barrio_facts::{PopulationLookup, PopulationTable, ReconcileError, disaggregate};

fn allocated(value: f64, candidates: &[i64], year: i32, table: &PopulationTable) -> Vec<f64> {
    disaggregate(value, candidates, year, Some(table))
        .unwrap()
        .into_iter()
        .map(|allocation| allocation.value)
        .collect()
}

#[test]
fn splits_by_same_year_population() {
    let mut table = PopulationTable::new();
    table.insert(5, 2022, 300.0);
    table.insert(6, 2022, 100.0);
    // A different year must not leak into the same-year tier
    table.insert(6, 2010, 100_000.0);

    let shares = allocated(400.0, &[5, 6], 2022, &table);
    assert!((shares[0] - 300.0).abs() < 1e-6);
    assert!((shares[1] - 100.0).abs() < 1e-6);
}

#[test]
fn falls_back_to_mean_population_for_missing_years() {
    // The year under disaggregation has no population data at all
    let mut table = PopulationTable::new();
    table.insert(5, 2020, 1000.0);
    table.insert(6, 2020, 2000.0);
    table.insert(7, 2020, 7000.0);

    let shares = allocated(900.0, &[5, 6, 7], 2022, &table);
    assert!((shares[0] - 90.0).abs() < 1e-6);
    assert!((shares[1] - 180.0).abs() < 1e-6);
    assert!((shares[2] - 630.0).abs() < 1e-6);
}

#[test]
fn mean_is_taken_across_known_years() {
    let mut table = PopulationTable::new();
    table.insert(1, 2020, 100.0);
    table.insert(1, 2021, 300.0); // mean 200
    table.insert(2, 2020, 200.0); // mean 200

    let shares = allocated(50.0, &[1, 2], 2022, &table);
    assert!((shares[0] - 25.0).abs() < 1e-6);
    assert!((shares[1] - 25.0).abs() < 1e-6);
}

#[test]
fn degrades_to_uniform_when_no_signal_exists() {
    let empty = PopulationTable::new();
    let shares = allocated(90.0, &[1, 2, 3], 2022, &empty);
    for share in shares {
        assert!((share - 30.0).abs() < 1e-6);
    }
}

#[test]
fn zero_populations_do_not_divide_by_zero() {
    let mut table = PopulationTable::new();
    table.insert(1, 2022, 0.0);
    table.insert(2, 2022, 0.0);

    let shares = allocated(10.0, &[1, 2], 2022, &table);
    assert!((shares[0] - 5.0).abs() < 1e-6);
    assert!((shares[1] - 5.0).abs() < 1e-6);
}

#[test]
fn allocation_conserves_the_value_across_all_tiers() {
    let mut table = PopulationTable::new();
    // Fractional populations, partial coverage: id 3 has no data at all
    table.insert(1, 2022, 123.45);
    table.insert(2, 2019, 0.373);
    let candidates = [1, 2, 3];

    for value in [0.0, 1.0, 900.0, 1e6, 0.000_4] {
        let total: f64 = allocated(value, &candidates, 2022, &table).iter().sum();
        assert!(
            (total - value).abs() < 1e-6,
            "allocation of {value} does not sum back (got {total})"
        );
    }

    // Uniform tier conserves too
    let total: f64 = allocated(900.0, &candidates, 2022, &PopulationTable::new())
        .iter()
        .sum();
    assert!((total - 900.0).abs() < 1e-6);
}

#[test]
fn table_builds_from_a_population_extract() {
    let ids: Int64Array = vec![Some(1), Some(2), None].into_iter().collect();
    let years: Int64Array = vec![Some(2022), Some(2022), Some(2022)].into_iter().collect();
    let populations: Float64Array = vec![Some(47_000.0), Some(15_500.0), Some(1.0)]
        .into_iter()
        .collect();
    let batch = RecordBatch::try_from_iter(vec![
        ("codi_barri", Arc::new(ids) as ArrayRef),
        ("any", Arc::new(years) as ArrayRef),
        ("poblacio", Arc::new(populations) as ArrayRef),
    ])
    .unwrap();

    let table = PopulationTable::from_batch(&batch, "codi_barri", "any", "poblacio").unwrap();
    assert_eq!(table.population(1, 2022), Some(47_000.0));
    assert_eq!(table.population(2, 2022), Some(15_500.0));

    let missing = PopulationTable::from_batch(&batch, "codi_barri", "any", "habitants");
    assert!(matches!(
        missing,
        Err(ReconcileError::SchemaViolation { .. })
    ));
}

#[test]
fn lookup_reports_mean_population() {
    let mut table = PopulationTable::new();
    table.insert(7, 2020, 100.0);
    table.insert(7, 2022, 300.0);

    assert_eq!(table.population(7, 2020), Some(100.0));
    assert_eq!(table.population(7, 2021), None);
    assert_eq!(table.mean_population(7), Some(200.0));
    assert_eq!(table.mean_population(8), None);
}
