//! In-process result store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::aggregate::ProjectAnalysisResult;
use crate::error::StoreError;

use super::AnalysisStore;

/// Result store backed by a map guarded by a lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    results: RwLock<HashMap<String, ProjectAnalysisResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of projects with a stored result.
    pub fn len(&self) -> usize {
        self.results.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn upsert(
        &self,
        project_id: &str,
        result: &ProjectAnalysisResult,
    ) -> Result<(), StoreError> {
        let mut results = self.results.write().map_err(|_| poisoned())?;
        results.insert(project_id.to_string(), result.clone());
        Ok(())
    }

    async fn get(&self, project_id: &str) -> Result<Option<ProjectAnalysisResult>, StoreError> {
        let results = self.results.read().map_err(|_| poisoned())?;
        Ok(results.get(project_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;

    #[tokio::test]
    async fn test_upsert_replaces_previous() {
        let store = MemoryStore::new();
        let first = aggregate("p1", &[]);
        let second = aggregate("p1", &[]);

        store.upsert("p1", &first).await.unwrap();
        store.upsert("p1", &second).await.unwrap();

        let stored = store.get("p1").await.unwrap().unwrap();
        assert_eq!(stored.id, second.id);
        assert_eq!(store.len(), 1);
        assert!(store.get("other").await.unwrap().is_none());
    }
}
