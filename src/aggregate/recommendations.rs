//! Threshold-based recommendations attached to a project result.

use super::types::ComplexityDistribution;

/// Average complexity above which a refactor is recommended.
pub const REFACTOR_AVERAGE_THRESHOLD: f64 = 10.0;

/// Average lines of code per file above which splitting is recommended.
pub const LARGE_FILE_AVERAGE_LOC: f64 = 300.0;

pub const MAX_RECOMMENDATIONS: usize = 3;

pub const REFACTOR_MESSAGE: &str =
    "Average complexity is above 10. Consider refactoring complex functions into smaller, focused units.";

pub const SPLIT_FILES_MESSAGE: &str =
    "Files average more than 300 lines of code. Consider splitting large files into smaller modules.";

pub const HEALTHY_MESSAGE: &str =
    "Code complexity is within healthy limits. Keep functions small and focused as the project grows.";

/// Inputs the recommendation rules look at.
pub struct RecommendationInput<'a> {
    pub total_files: usize,
    pub total_lines_of_code: usize,
    pub average_complexity: f64,
    pub distribution: &'a ComplexityDistribution,
}

/// Derive between one and three recommendations.
pub fn recommend(input: &RecommendationInput<'_>) -> Vec<String> {
    let mut out = Vec::new();

    if input.average_complexity > REFACTOR_AVERAGE_THRESHOLD {
        out.push(REFACTOR_MESSAGE.to_string());
    }

    if input.distribution.critical > 0 {
        out.push(format!(
            "{} file(s) have critical complexity (16 or more). Prioritize them for refactoring and test coverage.",
            input.distribution.critical
        ));
    }

    if input.total_files > 0 {
        let average_loc = input.total_lines_of_code as f64 / input.total_files as f64;
        if average_loc > LARGE_FILE_AVERAGE_LOC {
            out.push(SPLIT_FILES_MESSAGE.to_string());
        }
    }

    if out.is_empty() {
        out.push(HEALTHY_MESSAGE.to_string());
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
