//! Per-language regex bundles.
//!
//! Every bundle is compiled once into an immutable table indexed by
//! [`Language`]; lookups never allocate and never fail.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Language;

/// Keywords whose call-like use (`if (`, `while (`, ...) adds a complexity point.
pub const COMPLEXITY_CONSTRUCTS: [&str; 5] = ["if", "while", "for", "switch", "catch"];

/// Identifiers a function pattern may capture that are control-flow keywords
/// rather than declarations.
const RESERVED_NAMES: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "else", "do", "new", "typeof",
    "sizeof", "await", "elif", "foreach",
];

const C_STYLE_COMMENTS: &[&str] = &["//", "/*", "*"];
const HASH_COMMENTS: &[&str] = &["#"];

/// Compiled matchers for one language.
#[derive(Debug)]
pub struct LanguagePatterns {
    pub language: Language,
    pub function: Regex,
    pub class: Option<Regex>,
    /// Only TypeScript declares interfaces.
    pub interface: Option<Regex>,
    pub import: Option<Regex>,
    pub comment_prefixes: &'static [&'static str],
}

static TABLE: Lazy<[LanguagePatterns; 12]> = Lazy::new(|| Language::ALL.map(LanguagePatterns::build));

/// Return the pattern bundle for a language.
pub fn patterns(language: Language) -> &'static LanguagePatterns {
    &TABLE[language.index()]
}

fn re(pattern: &str) -> Regex {
    // Patterns are compile-time constants covered by the table test.
    Regex::new(pattern).unwrap()
}

impl LanguagePatterns {
    fn build(language: Language) -> Self {
        match language {
            Language::JavaScript => Self {
                language,
                function: re(
                    r"function\s*\*?\s+(\w+)|(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*=>|\w+\s*=>)|^\s*(?:async\s+)?(\w+)\s*\([^)]*\)\s*\{",
                ),
                class: Some(re(r"\bclass\s+(\w+)")),
                interface: None,
                import: Some(js_import()),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::TypeScript => Self {
                language,
                function: re(
                    r"function\s*\*?\s+(\w+)|(?:const|let|var)\s+(\w+)\s*(?::\s*[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::\s*[^=]+)?=>|\w+\s*=>)|^\s*(?:(?:public|private|protected|static|async|readonly)\s+)*(\w+)\s*(?:<[^>]*>)?\s*\([^)]*\)\s*(?::\s*[^{]+)?\{",
                ),
                class: Some(re(r"\bclass\s+(\w+)")),
                interface: Some(re(r"\binterface\s+(\w+)")),
                import: Some(js_import()),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::Python => Self {
                language,
                function: re(r"\bdef\s+(\w+)"),
                class: Some(re(r"\bclass\s+(\w+)")),
                interface: None,
                import: Some(re(r"^\s*from\s+([\w.]+)\s+import\b|^\s*import\s+([\w.]+)")),
                comment_prefixes: HASH_COMMENTS,
            },
            Language::Java => Self {
                language,
                function: re(
                    r"^\s*(?:(?:public|protected|private|static|final|abstract|synchronized|native|default)\s+)*(?:<[^>]+>\s+)?[\w<>\[\],.?]+\s+(\w+)\s*\([^)]*\)\s*(?:throws\s+[\w.,\s]+)?\{?\s*$",
                ),
                class: Some(re(r"\b(?:class|enum|record)\s+(\w+)")),
                interface: None,
                import: Some(re(r"^\s*import\s+(?:static\s+)?([\w.*]+)\s*;")),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::Go => Self {
                language,
                function: re(r"^\s*func\s+(?:\([^)]*\)\s*)?(\w+)"),
                class: Some(re(r"^\s*type\s+(\w+)\s+struct\b")),
                interface: None,
                import: Some(re(
                    r#"^\s*import\s+(?:[\w.]+\s+)?"([^"]+)"|^\s*(?:[\w.]+\s+)?"([\w./-]+)"\s*$"#,
                )),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::Rust => Self {
                language,
                function: re(r"\bfn\s+(\w+)"),
                class: Some(re(r"\b(?:struct|enum|trait)\s+(\w+)")),
                interface: None,
                import: Some(re(
                    r"^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+([\w:]+)|^\s*extern\s+crate\s+(\w+)",
                )),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::C => Self {
                language,
                function: re(
                    r"^\s*(?:(?:static|inline|extern|const|unsigned|signed)\s+)*[A-Za-z_]\w*[\s*]+(\w+)\s*\([^;]*\)\s*\{?\s*$",
                ),
                class: Some(re(r"^\s*(?:typedef\s+)?struct\s+(\w+)\s*\{")),
                interface: None,
                import: Some(c_include()),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::Cpp => Self {
                language,
                function: re(
                    r"^\s*(?:(?:static|inline|virtual|extern|const|constexpr|unsigned|signed)\s+)*[\w:<>,]+[\s*&]+(?:\w+::)*(~?\w+)\s*\([^;]*\)\s*(?:const\s*)?(?:override\s*)?\{?\s*$",
                ),
                class: Some(re(r"^\s*(?:class|struct)\s+(\w+)")),
                interface: None,
                import: Some(c_include()),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::CSharp => Self {
                language,
                function: re(
                    r"^\s*(?:(?:public|private|protected|internal|static|virtual|override|abstract|async|sealed)\s+)+[\w<>\[\],.?]+\s+(\w+)\s*\([^)]*\)",
                ),
                class: Some(re(r"\b(?:class|struct|record)\s+(\w+)")),
                interface: None,
                import: Some(re(r"^\s*using\s+(?:static\s+)?([\w.]+)\s*;")),
                comment_prefixes: C_STYLE_COMMENTS,
            },
            Language::Ruby => Self {
                language,
                function: re(r"^\s*def\s+(?:self\.)?(\w+[?!]?)"),
                class: Some(re(r"^\s*(?:class|module)\s+(\w+)")),
                interface: None,
                import: Some(re(r#"^\s*require(?:_relative)?\s*\(?\s*['"]([^'"]+)['"]"#)),
                comment_prefixes: HASH_COMMENTS,
            },
            Language::Php => Self {
                language,
                function: re(r"\bfunction\s+(\w+)"),
                class: Some(re(r"\b(?:class|trait)\s+(\w+)")),
                interface: None,
                import: Some(re(
                    r#"^\s*use\s+([\w\\]+)\s*;|^\s*(?:require|include)(?:_once)?\s*\(?\s*['"]([^'"]+)['"]"#,
                )),
                comment_prefixes: &["//", "#", "/*", "*"],
            },
            Language::Unknown => Self {
                language,
                function: re(r"(\w+)\s*\([^)]*\)\s*\{"),
                class: Some(re(r"\bclass\s+(\w+)")),
                interface: None,
                import: None,
                comment_prefixes: &["//", "#"],
            },
        }
    }

    /// Whether a trimmed line is a comment for this language.
    pub fn is_comment(&self, trimmed: &str) -> bool {
        self.comment_prefixes.iter().any(|p| trimmed.starts_with(p))
    }

    /// Function name declared on this line, if any.
    pub fn match_function<'a>(&self, line: &'a str) -> Option<&'a str> {
        first_capture(&self.function, line).filter(|name| !RESERVED_NAMES.contains(name))
    }

    pub fn match_class<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.class.as_ref().and_then(|re| first_capture(re, line))
    }

    pub fn match_interface<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.interface.as_ref().and_then(|re| first_capture(re, line))
    }

    pub fn match_import<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.import.as_ref().and_then(|re| first_capture(re, line))
    }
}

/// The first capture group that participated in the leftmost match.
fn first_capture<'a>(re: &Regex, line: &'a str) -> Option<&'a str> {
    let caps = re.captures(line)?;
    caps.iter().skip(1).flatten().next().map(|m| m.as_str())
}

fn js_import() -> Regex {
    re(
        r#"\bimport\s+(?:[\w*{}\s,]+\s+from\s+)?['"]([^'"]+)['"]|\brequire\(\s*['"]([^'"]+)['"]\s*\)|\bimport\(\s*['"]([^'"]+)['"]\s*\)"#,
    )
}

fn c_include() -> Regex {
    re(r#"^\s*#\s*include\s*[<"]([^>"]+)[>"]"#)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builds_for_every_language() {
        for lang in Language::ALL {
            assert_eq!(patterns(lang).language, lang);
        }
    }

    #[test]
    fn test_interface_only_for_typescript() {
        for lang in Language::ALL {
            assert_eq!(
                patterns(lang).interface.is_some(),
                lang == Language::TypeScript,
                "{}",
                lang
            );
        }
    }

    #[test]
    fn test_javascript_functions() {
        let p = patterns(Language::JavaScript);
        assert_eq!(p.match_function("function foo(){}"), Some("foo"));
        assert_eq!(p.match_function("export async function load(id) {"), Some("load"));
        assert_eq!(p.match_function("const handler = async (req, res) => {"), Some("handler"));
        assert_eq!(p.match_function("  render() {"), Some("render"));
        assert_eq!(p.match_function("if(x){}"), None);
        assert_eq!(p.match_function("class Bar{}"), None);
    }

    #[test]
    fn test_typescript_declarations() {
        let p = patterns(Language::TypeScript);
        assert_eq!(p.match_interface("export interface User {"), Some("User"));
        assert_eq!(p.match_class("export default class Store {"), Some("Store"));
        assert_eq!(
            p.match_function("const total = (a: number, b: number): number => a + b;"),
            Some("total")
        );
        assert_eq!(p.match_function("  private async save(doc: Doc): Promise<void> {"), Some("save"));
    }

    #[test]
    fn test_javascript_imports() {
        let p = patterns(Language::JavaScript);
        assert_eq!(p.match_import("import React from 'react';"), Some("react"));
        assert_eq!(p.match_import("import { a, b } from \"./utils\";"), Some("./utils"));
        assert_eq!(p.match_import("import './styles.css';"), Some("./styles.css"));
        assert_eq!(p.match_import("const fs = require('fs');"), Some("fs"));
    }

    #[test]
    fn test_python_patterns() {
        let p = patterns(Language::Python);
        assert_eq!(p.match_function("    def process(self, x):"), Some("process"));
        assert_eq!(p.match_class("class Parser(Base):"), Some("Parser"));
        assert_eq!(p.match_import("from os.path import join"), Some("os.path"));
        assert_eq!(p.match_import("import numpy as np"), Some("numpy"));
        assert!(p.is_comment("# comment"));
        assert!(!p.is_comment("x = 1  # trailing"));
    }

    #[test]
    fn test_go_patterns() {
        let p = patterns(Language::Go);
        assert_eq!(p.match_function("func (s *Server) Start() error {"), Some("Start"));
        assert_eq!(p.match_function("func main() {"), Some("main"));
        assert_eq!(p.match_class("type Server struct {"), Some("Server"));
        assert_eq!(p.match_import("import \"fmt\""), Some("fmt"));
        assert_eq!(p.match_import("\t\"net/http\""), Some("net/http"));
    }

    #[test]
    fn test_rust_and_c_family() {
        let rust = patterns(Language::Rust);
        assert_eq!(rust.match_function("pub async fn run(&self) -> Result<()> {"), Some("run"));
        assert_eq!(rust.match_class("pub enum Mode {"), Some("Mode"));
        assert_eq!(rust.match_import("use std::collections::HashMap;"), Some("std::collections::HashMap"));

        let c = patterns(Language::C);
        assert_eq!(c.match_function("static int parse_header(const char *buf) {"), Some("parse_header"));
        assert_eq!(c.match_import("#include <stdio.h>"), Some("stdio.h"));
        assert_eq!(c.match_function("    return compute(x);"), None);
    }

    #[test]
    fn test_unknown_language_fallback() {
        let p = patterns(Language::Unknown);
        assert_eq!(p.match_function("proc build(target) {"), Some("build"));
        assert!(p.import.is_none());
        assert!(p.is_comment("// note"));
        assert!(p.is_comment("# note"));
    }
}
