//! Persistent storage for project analysis results.
//!
//! A store keeps one live result per project. `upsert` replaces whatever was
//! stored before; there is no versioning and no locking across writers, so
//! concurrent analyses of the same project end with the last write.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::aggregate::ProjectAnalysisResult;
use crate::error::StoreError;

/// Upsert-by-project storage of analysis results.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert or replace the result for `project_id`.
    async fn upsert(
        &self,
        project_id: &str,
        result: &ProjectAnalysisResult,
    ) -> Result<(), StoreError>;

    /// Latest stored result for `project_id`, if any.
    async fn get(&self, project_id: &str) -> Result<Option<ProjectAnalysisResult>, StoreError>;
}
