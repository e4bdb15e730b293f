//! Reduction of per-file results into a project result.

use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::analysis::FileAnalysisResult;

use super::recommendations::{recommend, RecommendationInput};
use super::types::{
    ComplexityBand, ComplexityDistribution, ComplexitySummary, Dependencies,
    ProjectAnalysisResult,
};

/// Prefixes treated as project-internal by the documentation path.
pub const DEFAULT_INTERNAL_PREFIXES: &[&str] = &["@/", "~/", "src/"];

/// How imports are assigned to internal and external dependencies.
#[derive(Debug, Clone)]
enum DependencySplit<'a> {
    /// Every import is listed as external.
    None,
    /// Relative, absolute and prefixed imports are internal.
    ByPrefix(&'a [String]),
}

/// Running totals over a stream of file results.
#[derive(Debug, Default)]
struct Totals {
    files: usize,
    lines_of_code: usize,
    functions: usize,
    classes: usize,
    interfaces: usize,
    complexity: u64,
    distribution: ComplexityDistribution,
    languages: BTreeMap<String, usize>,
    imports: BTreeSet<String>,
}

impl Totals {
    fn add(&mut self, file: &FileAnalysisResult) {
        self.files += 1;
        self.lines_of_code += file.lines_of_code;
        self.functions += file.functions.len();
        self.classes += file.classes.len();
        self.interfaces += file.interfaces.len();
        self.complexity += u64::from(file.complexity);
        self.distribution
            .record(ComplexityBand::from_score(file.complexity));
        *self
            .languages
            .entry(file.language.as_str().to_string())
            .or_insert(0) += 1;
        self.imports.extend(file.imports.iter().cloned());
    }

    fn finish(self, project_id: &str, split: DependencySplit<'_>) -> ProjectAnalysisResult {
        let average = if self.files > 0 {
            self.complexity as f64 / self.files as f64
        } else {
            0.0
        };

        let recommendations = recommend(&RecommendationInput {
            total_files: self.files,
            total_lines_of_code: self.lines_of_code,
            average_complexity: average,
            distribution: &self.distribution,
        });

        let dependencies = match split {
            DependencySplit::None => Dependencies {
                internal: Vec::new(),
                external: self.imports.into_iter().collect(),
            },
            DependencySplit::ByPrefix(prefixes) => {
                let (internal, external): (Vec<String>, Vec<String>) = self
                    .imports
                    .into_iter()
                    .partition(|import| is_internal(import, prefixes));
                Dependencies { internal, external }
            }
        };

        ProjectAnalysisResult {
            id: Uuid::new_v4().to_string(),
            project_id: project_id.to_string(),
            total_files: self.files,
            total_lines_of_code: self.lines_of_code,
            function_count: self.functions,
            class_count: self.classes,
            interface_count: self.interfaces,
            complexity: ComplexitySummary {
                total: self.complexity,
                average,
                distribution: self.distribution,
            },
            language_distribution: self.languages,
            dependencies,
            recommendations,
            completed_at: Utc::now(),
        }
    }
}

/// Whether an import path refers to project code rather than a package.
pub fn is_internal(import: &str, prefixes: &[String]) -> bool {
    import.starts_with('.')
        || import.starts_with('/')
        || prefixes.iter().any(|p| import.starts_with(p.as_str()))
}

/// Aggregate file results for the live analysis path.
///
/// Dependencies are not split: `internal` stays empty and every distinct
/// import is listed under `external`.
pub fn aggregate(project_id: &str, results: &[FileAnalysisResult]) -> ProjectAnalysisResult {
    let mut totals = Totals::default();
    for file in results {
        totals.add(file);
    }
    totals.finish(project_id, DependencySplit::None)
}

/// Aggregate file results for documentation generation, splitting imports
/// into internal and external by path prefix.
pub fn aggregate_with_dependency_split(
    project_id: &str,
    results: &[FileAnalysisResult],
    internal_prefixes: &[String],
) -> ProjectAnalysisResult {
    let mut totals = Totals::default();
    for file in results {
        totals.add(file);
    }
    totals.finish(project_id, DependencySplit::ByPrefix(internal_prefixes))
}
