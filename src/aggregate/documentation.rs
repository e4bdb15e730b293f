//! On-demand summary used for documentation generation.
//!
//! Unlike the live pipeline this path runs synchronously on the rayon pool,
//! emits no progress and writes nothing to storage. It splits dependencies
//! into internal and external by path prefix.

use rayon::prelude::*;
use tracing::warn;

use crate::analysis::{FileAnalysisResult, FileAnalyzer, ProjectFile};

use super::aggregator::aggregate_with_dependency_split;
use super::types::ProjectAnalysisResult;

/// Analyze files in parallel and aggregate them with a dependency split.
///
/// Files that fail analysis are logged and left out of the summary.
pub fn summarize_for_documentation(
    project_id: &str,
    files: &[ProjectFile],
    analyzer: &FileAnalyzer,
    internal_prefixes: &[String],
) -> ProjectAnalysisResult {
    let results: Vec<FileAnalysisResult> = files
        .par_iter()
        .map(|f| (f, analyzer.analyze(f)))
        .collect::<Vec<_>>()
        .into_iter()
        .filter_map(|(f, result)| match result {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(project_id, file = %f.name, error = %e, "skipping file in documentation summary");
                None
            }
        })
        .collect();

    aggregate_with_dependency_split(project_id, &results, internal_prefixes)
}
