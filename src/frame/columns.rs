//! Column access helpers shared by the ingestion boundaries.
//!
//! Sources publish the same semantic role with different physical types
//! (years as strings, values with decimal commas, 32- vs 64-bit integers),
//! so every accessor here is lenient about the concrete Arrow type and
//! returns `None` for nulls and unparseable cells.

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::record_batch::RecordBatch;
use arrow_schema::DataType;

use crate::error::{ReconcileError, Result};

/// Fetch a required column by name, or fail with a schema violation naming
/// the dataset and the missing column
pub fn required_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
    dataset_id: &str,
) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ReconcileError::SchemaViolation {
            dataset_id: dataset_id.to_string(),
            message: format!("required column '{name}' is absent"),
        })
}

/// Read a cell as a string, accepting Utf8 and LargeUtf8 columns
#[must_use]
pub fn string_value(column: &ArrayRef, row: usize) -> Option<String> {
    if column.is_null(row) {
        return None;
    }
    match column.data_type() {
        DataType::Utf8 => column
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => column
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).to_string()),
        _ => None,
    }
}

/// Read a cell as a float, accepting numeric columns and numeric strings
/// (decimal commas included, which one source is fond of)
#[must_use]
pub fn numeric_value(column: &ArrayRef, row: usize) -> Option<f64> {
    if column.is_null(row) {
        return None;
    }
    match column.data_type() {
        DataType::Float64 => column
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => column
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => column
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => column
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int16 => column
            .as_any()
            .downcast_ref::<Int16Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Utf8 | DataType::LargeUtf8 => string_value(column, row)
            .and_then(|s| s.trim().replace(',', ".").parse().ok()),
        _ => None,
    }
}

/// Read a cell as an integer id, accepting integer columns and digit strings
#[must_use]
pub fn id_value(column: &ArrayRef, row: usize) -> Option<i64> {
    if column.is_null(row) {
        return None;
    }
    match column.data_type() {
        DataType::Int64 => column
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row)),
        DataType::Int32 => column
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| i64::from(a.value(row))),
        DataType::Int16 => column
            .as_any()
            .downcast_ref::<Int16Array>()
            .map(|a| i64::from(a.value(row))),
        DataType::Utf8 | DataType::LargeUtf8 => {
            string_value(column, row).and_then(|s| s.trim().parse().ok())
        }
        _ => None,
    }
}

/// Read a cell as a calendar year.
///
/// String cells keep only the leading digit run, which tolerates period
/// annotations such as "2022 (p)".
#[must_use]
pub fn year_value(column: &ArrayRef, row: usize) -> Option<i32> {
    if column.is_null(row) {
        return None;
    }
    match column.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => string_value(column, row).and_then(|s| {
            let digits: String = s.trim().chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        }),
        _ => id_value(column, row).and_then(|y| i32::try_from(y).ok()),
    }
}
