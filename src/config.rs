//! Analyzer configuration.
//!
//! Loaded from a YAML file. Every field is optional; a missing file means
//! defaults everywhere.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregate::DEFAULT_INTERNAL_PREFIXES;

/// Default config file names, searched in order.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["visualdocs.yaml", ".visualdocs.yaml"];

/// Files analyzed concurrently per batch when not configured.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyzerConfig {
    /// Files analyzed concurrently per batch (default: 10)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Per-file analysis timeout in milliseconds (default: none)
    #[serde(default)]
    pub file_timeout_ms: Option<u64>,
    /// Files larger than this many bytes fail analysis (default: no limit)
    #[serde(default)]
    pub max_file_bytes: Option<usize>,
    /// Glob patterns for paths to skip (e.g., "**/generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Import prefixes counted as internal by the documentation summary
    #[serde(default = "default_internal_prefixes")]
    pub internal_prefixes: Vec<String>,
    /// Where stored results live (default: platform data directory)
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_internal_prefixes() -> Vec<String> {
    DEFAULT_INTERNAL_PREFIXES.iter().map(|p| p.to_string()).collect()
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            file_timeout_ms: None,
            max_file_bytes: None,
            excluded_paths: Vec::new(),
            internal_prefixes: default_internal_prefixes(),
            store_dir: None,
        }
    }
}

impl AnalyzerConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Find the first default-named config file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the discovered config in `dir`, or defaults when there is none.
    pub fn load_or_default(dir: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        match Self::discover(dir) {
            Some(path) => {
                let config = Self::parse_file(&path)?;
                Ok((config, Some(path)))
            }
            None => Ok((Self::default(), None)),
        }
    }

    pub fn file_timeout(&self) -> Option<Duration> {
        self.file_timeout_ms.map(Duration::from_millis)
    }

    /// Validate the config for correctness.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }

        if self.file_timeout_ms == Some(0) {
            anyhow::bail!("file_timeout_ms must be positive when set");
        }

        for pattern in &self.excluded_paths {
            globset::Glob::new(pattern).map_err(|e| {
                anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e)
            })?;
        }

        if let Some(prefix) = self.internal_prefixes.iter().find(|p| p.is_empty()) {
            anyhow::bail!("internal_prefixes may not contain an empty prefix {:?}", prefix);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
batch_size: 4
file_timeout_ms: 2500
excluded_paths:
  - "**/generated/**"
"#;
        let config = AnalyzerConfig::parse_str(yaml).unwrap();
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.file_timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.internal_prefixes, vec!["@/", "~/", "src/"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = AnalyzerConfig::parse_str("  \n").unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.store_dir.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AnalyzerConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AnalyzerConfig {
            excluded_paths: vec!["src/{".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discover_prefers_visible_name() {
        let temp = TempDir::new().unwrap();
        assert!(AnalyzerConfig::discover(temp.path()).is_none());

        fs::write(temp.path().join(".visualdocs.yaml"), "batch_size: 2").unwrap();
        fs::write(temp.path().join("visualdocs.yaml"), "batch_size: 3").unwrap();

        let (config, path) = AnalyzerConfig::load_or_default(temp.path()).unwrap();
        assert_eq!(path.unwrap().file_name().unwrap(), "visualdocs.yaml");
        assert_eq!(config.batch_size, 3);
    }
}
