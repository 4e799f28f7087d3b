//! Reduction of efficiency traces to variability statistics and their
//! validation against reference benchmarks.

pub mod metrics;
pub mod normalize;
pub mod summary;
pub mod validation;
pub mod variability;

pub use metrics::{Metric, MetricSet};
pub use normalize::{normalize_series, normalize_table};
pub use summary::generate_summary;
pub use validation::{
    MetricComparison, ReferenceTable, SkipReason, ValidationOutcome, ValidationReport,
    validate_simulation,
};
pub use variability::{CodonVariability, VariabilitySummary, analyze_variability, summarize};
