//! Aggregation of per-file results into a project-level result.
//!
//! Two entry points exist on purpose:
//! - [`aggregate`] is the live path used by the batch pipeline; it does not
//!   split dependencies.
//! - [`aggregate_with_dependency_split`] / [`summarize_for_documentation`]
//!   serve documentation generation and classify imports by path prefix.

mod aggregator;
mod documentation;
mod recommendations;
mod types;

pub use aggregator::{
    aggregate, aggregate_with_dependency_split, is_internal, DEFAULT_INTERNAL_PREFIXES,
};
pub use documentation::summarize_for_documentation;
pub use recommendations::{
    recommend, RecommendationInput, HEALTHY_MESSAGE, LARGE_FILE_AVERAGE_LOC,
    MAX_RECOMMENDATIONS, REFACTOR_AVERAGE_THRESHOLD, REFACTOR_MESSAGE, SPLIT_FILES_MESSAGE,
};
pub use types::{
    ComplexityBand, ComplexityDistribution, ComplexitySummary, Dependencies,
    ProjectAnalysisResult,
};
