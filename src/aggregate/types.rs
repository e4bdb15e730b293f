//! Project-level result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity band of a file's complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityBand {
    /// 5 or less
    Low,
    /// 6 to 10
    Medium,
    /// 11 to 15
    High,
    /// 16 or more
    Critical,
}

impl ComplexityBand {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=5 => ComplexityBand::Low,
            6..=10 => ComplexityBand::Medium,
            11..=15 => ComplexityBand::High,
            _ => ComplexityBand::Critical,
        }
    }
}

impl std::fmt::Display for ComplexityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityBand::Low => write!(f, "low"),
            ComplexityBand::Medium => write!(f, "medium"),
            ComplexityBand::High => write!(f, "high"),
            ComplexityBand::Critical => write!(f, "critical"),
        }
    }
}

/// File counts per complexity band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

impl ComplexityDistribution {
    pub fn record(&mut self, band: ComplexityBand) {
        match band {
            ComplexityBand::Low => self.low += 1,
            ComplexityBand::Medium => self.medium += 1,
            ComplexityBand::High => self.high += 1,
            ComplexityBand::Critical => self.critical += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexitySummary {
    pub total: u64,
    pub average: f64,
    pub distribution: ComplexityDistribution,
}

/// Imports seen across the project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

/// Aggregated analysis of a whole project. One live instance per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysisResult {
    pub id: String,
    pub project_id: String,
    pub total_files: usize,
    pub total_lines_of_code: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub interface_count: usize,
    pub complexity: ComplexitySummary,
    pub language_distribution: BTreeMap<String, usize>,
    pub dependencies: Dependencies,
    pub recommendations: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl ProjectAnalysisResult {
    /// Whether two results carry the same metrics, ignoring run identity
    /// (`id` and `completed_at`).
    pub fn same_metrics(&self, other: &Self) -> bool {
        self.project_id == other.project_id
            && self.total_files == other.total_files
            && self.total_lines_of_code == other.total_lines_of_code
            && self.function_count == other.function_count
            && self.class_count == other.class_count
            && self.interface_count == other.interface_count
            && self.complexity == other.complexity
            && self.language_distribution == other.language_distribution
            && self.dependencies == other.dependencies
            && self.recommendations == other.recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(ComplexityBand::from_score(1), ComplexityBand::Low);
        assert_eq!(ComplexityBand::from_score(5), ComplexityBand::Low);
        assert_eq!(ComplexityBand::from_score(6), ComplexityBand::Medium);
        assert_eq!(ComplexityBand::from_score(10), ComplexityBand::Medium);
        assert_eq!(ComplexityBand::from_score(11), ComplexityBand::High);
        assert_eq!(ComplexityBand::from_score(15), ComplexityBand::High);
        assert_eq!(ComplexityBand::from_score(16), ComplexityBand::Critical);
        assert_eq!(ComplexityBand::from_score(400), ComplexityBand::Critical);
    }

    #[test]
    fn test_json_field_names() {
        let result = ProjectAnalysisResult {
            id: "r1".to_string(),
            project_id: "p1".to_string(),
            total_files: 0,
            total_lines_of_code: 0,
            function_count: 0,
            class_count: 0,
            interface_count: 0,
            complexity: ComplexitySummary::default(),
            language_distribution: BTreeMap::new(),
            dependencies: Dependencies::default(),
            recommendations: Vec::new(),
            completed_at: Utc::now(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("projectId").is_some());
        assert!(json.get("totalLinesOfCode").is_some());
        assert!(json.get("languageDistribution").is_some());
        assert!(json["complexity"]["distribution"].get("critical").is_some());
    }
}
