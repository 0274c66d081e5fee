//! Error handling for the reconciliation engine.

use arrow::error::ArrowError;

/// Errors that can occur during territory resolution and fact reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// A required column is absent from an input frame or has an unusable type.
    ///
    /// This is the one condition surfaced as a hard failure: there is no safe
    /// partial interpretation of a frame whose shape does not match the
    /// declared schema.
    #[error("schema violation in dataset '{dataset_id}': {message}")]
    SchemaViolation {
        /// Dataset the offending frame belongs to
        dataset_id: String,
        /// What was missing or malformed
        message: String,
    },

    /// A disaggregation candidate set is empty (e.g. a district label that
    /// matched no neighborhoods). Recovered locally by the caller.
    #[error("disaggregation candidate set is empty")]
    EmptyCandidateSet,

    /// Two dimension entries collapsed onto the same normalized name while
    /// building the dimension. The uniqueness invariant is broken at the
    /// source and cannot be repaired here.
    #[error("duplicate normalized name in neighborhood dimension: '{normalized_name}'")]
    DimensionConflict {
        /// The normalized name that appeared more than once
        normalized_name: String,
    },

    /// Arrow error while reading an input frame
    #[error("Arrow error: {0}")]
    ArrowError(#[from] ArrowError),
}

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
