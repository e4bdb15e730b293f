//! File source that walks a local directory.

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::analysis::ProjectFile;
use crate::error::AnalysisError;
use crate::language::Language;

use super::FileSource;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "dist",
    "build",
    "__pycache__",
];

/// Treats one directory tree as a single project.
///
/// Only files with a recognized source extension are loaded. Bodies that are
/// not valid UTF-8 are returned with `content: None`, so they fail analysis
/// individually instead of aborting the load.
pub struct DirectoryFileSource {
    project_id: String,
    root: PathBuf,
    excluded: GlobSet,
}

impl DirectoryFileSource {
    /// Create a source for `root`, excluding paths matching any of the
    /// `excluded_paths` globs (matched against paths relative to `root`).
    pub fn new<P: AsRef<Path>>(
        project_id: impl Into<String>,
        root: P,
        excluded_paths: &[String],
    ) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in excluded_paths {
            let glob = Glob::new(pattern)
                .map_err(|e| anyhow::anyhow!("invalid excluded path {:?}: {}", pattern, e))?;
            builder.add(glob);
        }

        Ok(Self {
            project_id: project_id.into(),
            root: root.as_ref().to_path_buf(),
            excluded: builder.build()?,
        })
    }

}

/// Walk `root` and read every source file below it.
///
/// Only a missing root fails the walk. Entries that cannot be visited
/// (dangling links, loops, permissions) are skipped with a warning, and
/// source files that cannot be read are kept with `content: None`.
fn collect_files(root: &Path, excluded: &GlobSet) -> std::io::Result<Vec<ProjectFile>> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "project root is not a directory",
        ));
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.iter().any(|d| *d == name)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if Language::from_extension(ext) == Language::Unknown {
            continue;
        }

        let rel_path = path
            .strip_prefix(root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        if excluded.is_match(&rel_path) {
            debug!(file = %rel_path, "excluded by pattern");
            continue;
        }

        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8(bytes).ok(),
            Err(e) => {
                warn!(file = %rel_path, error = %e, "cannot read file");
                None
            }
        };
        files.push(ProjectFile {
            id: rel_path.clone(),
            name: rel_path,
            content,
            language: None,
        });
    }

    Ok(files)
}

#[async_trait]
impl FileSource for DirectoryFileSource {
    async fn load_project_files(
        &self,
        project_id: &str,
        _user_id: &str,
    ) -> Result<Vec<ProjectFile>, AnalysisError> {
        if project_id != self.project_id {
            return Err(AnalysisError::ProjectNotFound(project_id.to_string()));
        }

        let root = self.root.clone();
        let excluded = self.excluded.clone();
        tokio::task::spawn_blocking(move || collect_files(&root, &excluded))
            .await
            .map_err(|e| AnalysisError::Source(e.to_string()))?
            .map_err(|e| AnalysisError::Source(format!("{}: {}", self.root.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_walks_source_files_only() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::create_dir_all(temp.path().join("node_modules/dep")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("src/app.js"), "function app() {}").unwrap();
        fs::write(temp.path().join("src/notes.txt"), "notes").unwrap();
        fs::write(temp.path().join("node_modules/dep/index.js"), "x").unwrap();
        fs::write(temp.path().join(".git/hook.py"), "x").unwrap();
        fs::write(temp.path().join("main.py"), "def main(): pass").unwrap();

        let source = DirectoryFileSource::new("local", temp.path(), &[]).unwrap();
        let files = source.load_project_files("local", "anyone").await.unwrap();

        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["main.py", "src/app.js"]);
    }

    #[tokio::test]
    async fn test_excluded_globs_and_binary_content() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("generated")).unwrap();
        fs::write(temp.path().join("generated/api.ts"), "export class Api {}").unwrap();
        fs::write(temp.path().join("blob.c"), [0xff, 0xfe, 0x00]).unwrap();

        let source =
            DirectoryFileSource::new("local", temp.path(), &["generated/**".to_string()]).unwrap();
        let files = source.load_project_files("local", "anyone").await.unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "blob.c");
        assert!(files[0].content.is_none());
    }

    #[tokio::test]
    async fn test_other_project_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let source = DirectoryFileSource::new("local", temp.path(), &[]).unwrap();
        assert!(matches!(
            source.load_project_files("remote", "u").await,
            Err(AnalysisError::ProjectNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_does_not_abort_load() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("good.js"), "function good() {}").unwrap();
        std::os::unix::fs::symlink(temp.path().join("missing.js"), temp.path().join("dangling.js"))
            .unwrap();

        let source = DirectoryFileSource::new("local", temp.path(), &[]).unwrap();
        let files = source.load_project_files("local", "anyone").await.unwrap();

        let good = files.iter().find(|f| f.name == "good.js").unwrap();
        assert!(good.content.is_some());
        assert!(files
            .iter()
            .filter(|f| f.name != "good.js")
            .all(|f| f.content.is_none()));
    }

    #[tokio::test]
    async fn test_missing_root_is_a_source_error() {
        let temp = TempDir::new().unwrap();
        let source = DirectoryFileSource::new("local", temp.path().join("gone"), &[]).unwrap();
        assert!(matches!(
            source.load_project_files("local", "u").await,
            Err(AnalysisError::Source(_))
        ));
    }

    #[test]
    fn test_invalid_glob_is_rejected() {
        assert!(DirectoryFileSource::new("local", ".", &["a{".to_string()]).is_err());
    }
}
