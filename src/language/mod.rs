//! Language identification and the per-language pattern registry.

mod patterns;

pub use patterns::{patterns, LanguagePatterns, COMPLEXITY_CONSTRUCTS};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Languages the analyzer has dedicated patterns for.
///
/// Anything else resolves to [`Language::Unknown`], which uses the generic
/// brace-based pattern bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Go,
    Rust,
    C,
    Cpp,
    CSharp,
    Ruby,
    Php,
    Unknown,
}

/// File extension to language lookup.
static EXTENSIONS: phf::Map<&'static str, Language> = phf::phf_map! {
    "js" => Language::JavaScript,
    "jsx" => Language::JavaScript,
    "mjs" => Language::JavaScript,
    "cjs" => Language::JavaScript,
    "ts" => Language::TypeScript,
    "tsx" => Language::TypeScript,
    "mts" => Language::TypeScript,
    "py" => Language::Python,
    "java" => Language::Java,
    "go" => Language::Go,
    "rs" => Language::Rust,
    "c" => Language::C,
    "h" => Language::C,
    "cpp" => Language::Cpp,
    "cc" => Language::Cpp,
    "cxx" => Language::Cpp,
    "hpp" => Language::Cpp,
    "cs" => Language::CSharp,
    "rb" => Language::Ruby,
    "php" => Language::Php,
};

impl Language {
    /// All languages, in table order.
    pub const ALL: [Language; 12] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Java,
        Language::Go,
        Language::Rust,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Ruby,
        Language::Php,
        Language::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Unknown => "unknown",
        }
    }

    /// Position of this language in [`Language::ALL`].
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Resolve a language tag such as `"TypeScript"`, `"ts"` or `"py"`.
    ///
    /// Unrecognized tags map to `Unknown`.
    pub fn from_id(id: &str) -> Self {
        match id.trim().to_lowercase().as_str() {
            "javascript" | "js" | "jsx" | "node" => Language::JavaScript,
            "typescript" | "ts" | "tsx" => Language::TypeScript,
            "python" | "py" => Language::Python,
            "java" => Language::Java,
            "go" | "golang" => Language::Go,
            "rust" | "rs" => Language::Rust,
            "c" => Language::C,
            "cpp" | "c++" | "cxx" => Language::Cpp,
            "csharp" | "c#" | "cs" => Language::CSharp,
            "ruby" | "rb" => Language::Ruby,
            "php" => Language::Php,
            _ => Language::Unknown,
        }
    }

    /// Determine the language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        EXTENSIONS
            .get(ext.to_lowercase().as_str())
            .copied()
            .unwrap_or(Language::Unknown)
    }

    /// Determine the language of a file, preferring an explicit tag over the
    /// file name's extension.
    pub fn detect(tag: Option<&str>, file_name: &str) -> Self {
        if let Some(lang) = tag.map(Language::from_id) {
            if lang != Language::Unknown {
                return lang;
            }
        }
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        Language::from_extension(ext)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
