//! VisualDocs analyzer - single-pass source analysis for project
//! documentation.
//!
//! Every file of a project is scanned once, line by line, with per-language
//! regex patterns. The per-file facts (functions, classes, interfaces,
//! imports, complexity, lines of code) are folded into one project result
//! that is stored and used to drive generated documentation.
//!
//! # Architecture
//!
//! - `language`: supported languages and their immutable pattern table
//! - `analysis`: per-file line scanner and complexity heuristic
//! - `aggregate`: project totals, severity buckets, dependencies, recommendations
//! - `pipeline`: batch orchestration, progress events, cancellation
//! - `source`: where project files come from (memory, local directory)
//! - `store`: where project results go (memory, JSON files)
//! - `config`: YAML analyzer configuration
//! - `report`: output formatting (pretty, JSON)
//!
//! # Adding a New Language
//!
//! Add a variant to [`Language`], map its extensions in `language/mod.rs` and
//! give it a pattern bundle in `language/patterns.rs`.

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod store;

pub use aggregate::{
    aggregate, aggregate_with_dependency_split, summarize_for_documentation, ComplexityBand,
    ComplexityDistribution, ProjectAnalysisResult,
};
pub use analysis::{FileAnalysisResult, FileAnalyzer, ProjectFile};
pub use config::AnalyzerConfig;
pub use error::{AnalysisError, FileError, StoreError};
pub use language::Language;
pub use pipeline::{
    AnalysisService, AnalysisStatus, CancellationToken, ProgressBroadcaster, ProgressEvent,
    ProgressSink,
};
pub use source::{DirectoryFileSource, FileSource, MemoryFileSource};
pub use store::{AnalysisStore, JsonFileStore, MemoryStore};
