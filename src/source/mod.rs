//! Sources of project files.
//!
//! The pipeline takes one read-only snapshot of a project's files at the
//! start of a run and never goes back to the source afterwards.

mod directory;

pub use directory::DirectoryFileSource;

use async_trait::async_trait;
use std::collections::HashMap;

use crate::analysis::ProjectFile;
use crate::error::AnalysisError;

/// Supplies the files of a project on behalf of a user.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Load every file of `project_id`.
    ///
    /// Fails with `ProjectNotFound` for unknown projects and `Unauthorized`
    /// when `user_id` does not own the project.
    async fn load_project_files(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Vec<ProjectFile>, AnalysisError>;
}

struct OwnedProject {
    owner: String,
    files: Vec<ProjectFile>,
}

/// Owner-checked in-memory file source.
#[derive(Default)]
pub struct MemoryFileSource {
    projects: HashMap<String, OwnedProject>,
}

impl MemoryFileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a project owned by `owner`.
    pub fn insert_project(
        &mut self,
        project_id: impl Into<String>,
        owner: impl Into<String>,
        files: Vec<ProjectFile>,
    ) {
        self.projects.insert(
            project_id.into(),
            OwnedProject {
                owner: owner.into(),
                files,
            },
        );
    }

    pub fn with_project(
        mut self,
        project_id: impl Into<String>,
        owner: impl Into<String>,
        files: Vec<ProjectFile>,
    ) -> Self {
        self.insert_project(project_id, owner, files);
        self
    }
}

#[async_trait]
impl FileSource for MemoryFileSource {
    async fn load_project_files(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Vec<ProjectFile>, AnalysisError> {
        let project = self
            .projects
            .get(project_id)
            .ok_or_else(|| AnalysisError::ProjectNotFound(project_id.to_string()))?;

        if project.owner != user_id {
            return Err(AnalysisError::Unauthorized {
                project_id: project_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        Ok(project.files.clone())
    }
}
