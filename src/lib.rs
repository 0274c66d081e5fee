//! A Rust library for resolving free-text territory labels against a
//! canonical neighborhood dimension and reconciling multi-source fact
//! observations into one deduplicated fact table with full provenance.

pub mod config;
pub mod dimension;
pub mod disaggregate;
pub mod error;
pub mod frame;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod resolve;

// Re-export the most common types for easier use
// Core types
pub use config::ResolverConfig;
pub use error::{ReconcileError, Result};

// Dimension and resolution
pub use dimension::{DimensionSchema, NeighborhoodDimension, NeighborhoodEntry};
pub use normalize::{AliasTable, LabelNormalizer};
pub use resolve::{
    ConfidenceTier, Granularity, ResolutionDiagnostics, ResolutionResult, TerritoryResolver,
};

// Disaggregation
pub use disaggregate::{Allocation, PopulationLookup, PopulationTable, disaggregate};

// Fact merging
pub use merge::{FactObservation, MergedFact, merge, merge_frames, normalize_tag};

// Ingestion boundary and pipeline
pub use frame::{SourceSchema, TerritoryObservation, extract_observations};
pub use pipeline::{FrameOutcome, MetricOutcome, ReconcilePipeline, SourceFrame};
