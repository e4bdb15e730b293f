//! File-backed result store: one pretty JSON document per project.
//!
//! Results are stored in `~/.local/share/visualdocs/analyses/` by default
//! (platform data directory).

use async_trait::async_trait;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::aggregate::ProjectAnalysisResult;
use crate::error::StoreError;

use super::AnalysisStore;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Platform data directory for stored analyses, if one can be resolved.
    pub fn default_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "visualdocs").map(|dirs| dirs.data_dir().join("analyses"))
    }

    /// File holding the result for a project.
    ///
    /// ASCII letters, digits and `-` are kept; every other byte, `_`
    /// included, is written as `_XX` hex. Distinct ids never share a file.
    pub fn path_for(&self, project_id: &str) -> PathBuf {
        let mut filename = String::with_capacity(project_id.len());
        for byte in project_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                filename.push(char::from(byte));
            } else {
                filename.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", filename))
    }
}

#[async_trait]
impl AnalysisStore for JsonFileStore {
    async fn upsert(
        &self,
        project_id: &str,
        result: &ProjectAnalysisResult,
    ) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(result)?;

        // Each writer gets its own temp file; the rename replaces the
        // target in one step, so readers see the old or the new document.
        let target = self.path_for(project_id);
        let staging = target.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&staging, json).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&staging, &target).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }
        Ok(())
    }

    async fn get(&self, project_id: &str) -> Result<Option<ProjectAnalysisResult>, StoreError> {
        match tokio::fs::read(self.path_for(project_id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path().join("nested"));

        assert!(store.get("p1").await.unwrap().is_none());

        let result = aggregate("p1", &[]);
        store.upsert("p1", &result).await.unwrap();

        let loaded = store.get("p1").await.unwrap().unwrap();
        assert_eq!(loaded.id, result.id);
        assert!(loaded.same_metrics(&result));
    }

    #[test]
    fn test_path_is_sanitized() {
        let store = JsonFileStore::new("/tmp/x");
        assert_eq!(
            store.path_for("../evil/id"),
            PathBuf::from("/tmp/x/_2E_2E_2Fevil_2Fid.json")
        );
        assert_eq!(store.path_for("app-1"), PathBuf::from("/tmp/x/app-1.json"));
    }

    #[tokio::test]
    async fn test_similar_ids_do_not_share_a_file() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path());
        assert_ne!(store.path_for("team/app"), store.path_for("team_app"));

        store.upsert("team/app", &aggregate("team/app", &[])).await.unwrap();
        store.upsert("team_app", &aggregate("team_app", &[])).await.unwrap();

        let loaded = store.get("team/app").await.unwrap().unwrap();
        assert_eq!(loaded.project_id, "team/app");
        let loaded = store.get("team_app").await.unwrap().unwrap();
        assert_eq!(loaded.project_id, "team_app");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_leave_valid_json() {
        let temp = TempDir::new().unwrap();
        let store = Arc::new(JsonFileStore::new(temp.path()));

        let mut large = aggregate("p", &[]);
        large.dependencies.external = (0..400).map(|i| format!("package-{}", i)).collect();
        let mut small = aggregate("p", &[]);
        small.dependencies.external = vec!["one".to_string()];

        for _ in 0..100 {
            let (a, b) = (Arc::clone(&store), Arc::clone(&store));
            let (l, s) = (large.clone(), small.clone());
            let first = tokio::spawn(async move { a.upsert("p", &l).await });
            let second = tokio::spawn(async move { b.upsert("p", &s).await });
            first.await.unwrap().unwrap();
            second.await.unwrap().unwrap();

            let loaded = store.get("p").await.unwrap().unwrap();
            assert!(loaded.id == large.id || loaded.id == small.id);
        }

        let leftovers: Vec<_> = std::fs::read_dir(temp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp.path());
        std::fs::write(store.path_for("p1"), "not json").unwrap();
        assert!(matches!(store.get("p1").await, Err(StoreError::Serialization(_))));
    }
}
