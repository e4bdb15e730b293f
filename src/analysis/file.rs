//! Single-pass file analyzer.

use std::collections::HashSet;

use crate::error::FileError;
use crate::language::patterns;

use super::complexity::{line_complexity, BASE_COMPLEXITY};
use super::{FileAnalysisResult, ProjectFile};

/// Scans a file's text once, collecting declarations and a complexity score.
#[derive(Debug, Clone, Default)]
pub struct FileAnalyzer {
    max_file_bytes: Option<usize>,
}

/// Insertion-ordered set of names.
#[derive(Default)]
struct NameSet {
    seen: HashSet<String>,
    names: Vec<String>,
}

impl NameSet {
    fn insert(&mut self, name: &str) {
        if self.seen.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl FileAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject bodies larger than `limit` bytes instead of scanning them.
    pub fn with_max_file_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_file_bytes = limit;
        self
    }

    /// Analyze one project file.
    ///
    /// Blank lines and comment-prefixed lines are skipped. Multi-line block
    /// comments are not tracked, so their inner lines count as code unless
    /// they start with a comment prefix themselves.
    pub fn analyze(&self, file: &ProjectFile) -> Result<FileAnalysisResult, FileError> {
        let content = file
            .content
            .as_deref()
            .ok_or_else(|| FileError::MissingContent(file.name.clone()))?;

        if let Some(limit) = self.max_file_bytes {
            if content.len() > limit {
                return Err(FileError::TooLarge {
                    name: file.name.clone(),
                    size: content.len(),
                    limit,
                });
            }
        }

        let language = file.language();
        let patterns = patterns(language);

        let mut lines_of_code = 0;
        let mut complexity = BASE_COMPLEXITY;
        let mut functions = NameSet::default();
        let mut classes = NameSet::default();
        let mut interfaces = NameSet::default();
        let mut imports = NameSet::default();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || patterns.is_comment(trimmed) {
                continue;
            }
            lines_of_code += 1;

            if let Some(name) = patterns.match_function(line) {
                functions.insert(name);
            }
            if let Some(name) = patterns.match_class(line) {
                classes.insert(name);
            }
            if let Some(name) = patterns.match_interface(line) {
                interfaces.insert(name);
            }
            if let Some(name) = patterns.match_import(line) {
                imports.insert(name);
            }

            complexity += line_complexity(line);
        }

        Ok(FileAnalysisResult {
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            language,
            lines_of_code,
            functions: functions.into_vec(),
            classes: classes.into_vec(),
            interfaces: interfaces.into_vec(),
            imports: imports.into_vec(),
            complexity,
        })
    }
}
