//! Input records and per-file results.

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// One source file of a project, as supplied by a file source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub id: String,
    pub name: String,
    /// `None` when the body could not be read or decoded.
    #[serde(default)]
    pub content: Option<String>,
    /// Explicit language tag; falls back to the file extension when absent.
    #[serde(default)]
    pub language: Option<String>,
}

impl ProjectFile {
    pub fn new(id: impl Into<String>, name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content: Some(content.into()),
            language: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Resolved language of this file.
    pub fn language(&self) -> Language {
        Language::detect(self.language.as_deref(), &self.name)
    }
}

/// Structural facts extracted from one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysisResult {
    pub file_id: String,
    pub file_name: String,
    pub language: Language,
    pub lines_of_code: usize,
    pub functions: Vec<String>,
    pub classes: Vec<String>,
    pub interfaces: Vec<String>,
    pub imports: Vec<String>,
    pub complexity: u32,
}
