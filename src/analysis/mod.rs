//! Heuristic per-file source analysis.
//!
//! Each file is scanned once, line by line, against the regex bundle of its
//! language. No AST is built: false positives and negatives are part of the
//! observable behavior and are kept stable across runs.

mod complexity;
mod file;
mod types;

pub use complexity::{line_complexity, BASE_COMPLEXITY};
pub use file::FileAnalyzer;
pub use types::{FileAnalysisResult, ProjectFile};
