//! Batch orchestration of a project analysis run.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::aggregate::{aggregate, summarize_for_documentation, ProjectAnalysisResult};
use crate::analysis::{FileAnalysisResult, FileAnalyzer, ProjectFile};
use crate::config::{AnalyzerConfig, DEFAULT_BATCH_SIZE};
use crate::error::{AnalysisError, FileError, Result};
use crate::source::FileSource;
use crate::store::AnalysisStore;

use super::cancel::CancellationToken;
use super::progress::{
    batch_progress, AnalysisStatus, NoopProgress, ProgressEvent, ProgressSink,
    AGGREGATED_PROGRESS, SETUP_PROGRESS,
};

/// Runs project analyses: loads a file snapshot, scans it in sequential
/// batches, aggregates the survivors and upserts the result.
pub struct AnalysisService {
    source: Arc<dyn FileSource>,
    store: Arc<dyn AnalysisStore>,
    progress: Arc<dyn ProgressSink>,
    analyzer: Arc<FileAnalyzer>,
    batch_size: usize,
    file_timeout: Option<Duration>,
    internal_prefixes: Vec<String>,
}

impl AnalysisService {
    pub fn new(source: Arc<dyn FileSource>, store: Arc<dyn AnalysisStore>) -> Self {
        let defaults = AnalyzerConfig::default();
        Self {
            source,
            store,
            progress: Arc::new(NoopProgress),
            analyzer: Arc::new(FileAnalyzer::new()),
            batch_size: DEFAULT_BATCH_SIZE,
            file_timeout: None,
            internal_prefixes: defaults.internal_prefixes,
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Apply batch size, timeout, size limit and internal prefixes.
    pub fn with_config(mut self, config: &AnalyzerConfig) -> Self {
        self.batch_size = config.batch_size.max(1);
        self.file_timeout = config.file_timeout();
        self.analyzer = Arc::new(FileAnalyzer::new().with_max_file_bytes(config.max_file_bytes));
        self.internal_prefixes = config.internal_prefixes.clone();
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Analyze every file of a project and store the aggregate.
    pub async fn analyze_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<ProjectAnalysisResult> {
        self.analyze_project_with_cancel(project_id, user_id, &CancellationToken::new())
            .await
    }

    /// Like [`analyze_project`](Self::analyze_project), stopping at the next
    /// batch boundary once `cancel` fires. A cancelled run stores nothing.
    pub async fn analyze_project_with_cancel(
        &self,
        project_id: &str,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ProjectAnalysisResult> {
        self.emit(ProgressEvent::new(
            project_id,
            user_id,
            AnalysisStatus::Starting,
            0,
        ));

        match self.run(project_id, user_id, cancel).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!(project_id, error = %e, "analysis failed");
                self.emit(
                    ProgressEvent::new(project_id, user_id, AnalysisStatus::Failed, 0)
                        .with_error(e.to_string()),
                );
                Err(e)
            }
        }
    }

    /// Documentation summary of a project: same scan, imports split into
    /// internal and external by prefix. Nothing is stored and no progress is
    /// reported.
    pub async fn generate_documentation_summary(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<ProjectAnalysisResult> {
        let files = self.source.load_project_files(project_id, user_id).await?;
        if files.is_empty() {
            return Err(AnalysisError::NoFiles(project_id.to_string()));
        }

        let analyzer = Arc::clone(&self.analyzer);
        let prefixes = self.internal_prefixes.clone();
        let project = project_id.to_string();
        tokio::task::spawn_blocking(move || {
            summarize_for_documentation(&project, &files, &analyzer, &prefixes)
        })
        .await
        .map_err(|e| AnalysisError::Source(format!("documentation task failed: {}", e)))
    }

    async fn run(
        &self,
        project_id: &str,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ProjectAnalysisResult> {
        let files = self.source.load_project_files(project_id, user_id).await?;
        if files.is_empty() {
            return Err(AnalysisError::NoFiles(project_id.to_string()));
        }

        let total = files.len();
        info!(project_id, total_files = total, batch_size = self.batch_size, "starting analysis");
        self.emit(
            ProgressEvent::new(project_id, user_id, AnalysisStatus::InProgress, SETUP_PROGRESS)
                .with_files(0, total),
        );

        let mut results = Vec::with_capacity(total);
        let mut processed = 0;

        for (batch, chunk) in files.chunks(self.batch_size).enumerate() {
            if cancel.is_cancelled() {
                return Err(self.cancelled(project_id, cancel));
            }

            let outcomes = self.analyze_batch(chunk).await;
            let before = results.len();
            for (file, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        warn!(project_id, file = %file.name, error = %e, "skipping file")
                    }
                }
            }

            processed += chunk.len();
            debug!(
                project_id,
                batch,
                succeeded = results.len() - before,
                failed = chunk.len() - (results.len() - before),
                "batch finished"
            );
            self.emit(
                ProgressEvent::new(
                    project_id,
                    user_id,
                    AnalysisStatus::InProgress,
                    batch_progress(processed, total),
                )
                .with_files(processed, total),
            );
        }

        let result = aggregate(project_id, &results);
        self.emit(
            ProgressEvent::new(
                project_id,
                user_id,
                AnalysisStatus::InProgress,
                AGGREGATED_PROGRESS,
            )
            .with_files(processed, total),
        );

        if cancel.is_cancelled() {
            return Err(self.cancelled(project_id, cancel));
        }

        self.store.upsert(project_id, &result).await?;
        info!(
            project_id,
            analyzed = result.total_files,
            failed = total - result.total_files,
            "analysis stored"
        );
        self.emit(
            ProgressEvent::new(project_id, user_id, AnalysisStatus::Completed, 100)
                .with_files(processed, total),
        );

        Ok(result)
    }

    /// Scan one batch concurrently on the blocking pool. The output is in
    /// input order, one outcome per file.
    async fn analyze_batch(
        &self,
        batch: &[ProjectFile],
    ) -> Vec<std::result::Result<FileAnalysisResult, FileError>> {
        let tasks = batch.iter().cloned().map(|file| {
            let analyzer = Arc::clone(&self.analyzer);
            let timeout = self.file_timeout;
            async move {
                let name = file.name.clone();
                let handle = tokio::task::spawn_blocking(move || analyzer.analyze(&file));
                let joined = match timeout {
                    Some(limit) => match tokio::time::timeout(limit, handle).await {
                        Ok(joined) => joined,
                        Err(_) => return Err(FileError::Timeout(name)),
                    },
                    None => handle.await,
                };
                joined.unwrap_or_else(|e| {
                    Err(FileError::Aborted {
                        name,
                        reason: e.to_string(),
                    })
                })
            }
        });

        join_all(tasks).await
    }

    fn cancelled(&self, project_id: &str, cancel: &CancellationToken) -> AnalysisError {
        info!(project_id, reason = ?cancel.reason(), "analysis cancelled");
        AnalysisError::Cancelled(project_id.to_string())
    }

    fn emit(&self, event: ProgressEvent) {
        self.progress.emit(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::pipeline::ProgressBroadcaster;
    use crate::source::MemoryFileSource;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<ProgressEvent>>,
    }

    impl RecordingSink {
        fn statuses(&self) -> Vec<(AnalysisStatus, u8)> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| (e.status, e.progress))
                .collect()
        }
    }

    impl ProgressSink for RecordingSink {
        fn emit(&self, event: &ProgressEvent) {
            self.events.lock().unwrap().push(event.clone());
        }
    }

    /// Memory store that also remembers the order of written result ids.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryStore,
        writes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl AnalysisStore for RecordingStore {
        async fn upsert(
            &self,
            project_id: &str,
            result: &ProjectAnalysisResult,
        ) -> std::result::Result<(), StoreError> {
            self.inner.upsert(project_id, result).await?;
            self.writes.lock().unwrap().push(result.id.to_string());
            Ok(())
        }

        async fn get(
            &self,
            project_id: &str,
        ) -> std::result::Result<Option<ProjectAnalysisResult>, StoreError> {
            self.inner.get(project_id).await
        }
    }

    /// Log output collected by a test subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn js_files(count: usize) -> Vec<ProjectFile> {
        (0..count)
            .map(|i| {
                ProjectFile::new(
                    format!("f{}", i),
                    format!("file{}.js", i),
                    format!("function f{}() {{\n  if (x) {{ return 1; }}\n}}\n", i),
                )
            })
            .collect()
    }

    fn service(
        files: Vec<ProjectFile>,
        store: Arc<dyn AnalysisStore>,
        sink: Arc<dyn ProgressSink>,
    ) -> AnalysisService {
        let source = MemoryFileSource::new().with_project("p1", "alice", files);
        AnalysisService::new(Arc::new(source), store).with_progress(sink)
    }

    #[tokio::test]
    async fn test_progress_sequence_and_stored_result() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let svc = service(js_files(25), store.clone(), sink.clone());

        let result = svc.analyze_project("p1", "alice").await.unwrap();

        assert_eq!(result.total_files, 25);
        assert_eq!(result.function_count, 25);
        assert_eq!(result.complexity.total, 50);
        assert_eq!(
            sink.statuses(),
            vec![
                (AnalysisStatus::Starting, 0),
                (AnalysisStatus::InProgress, 10),
                (AnalysisStatus::InProgress, 38),
                (AnalysisStatus::InProgress, 66),
                (AnalysisStatus::InProgress, 80),
                (AnalysisStatus::InProgress, 90),
                (AnalysisStatus::Completed, 100),
            ]
        );

        let events = sink.events.lock().unwrap();
        assert_eq!(events[2].completed_files, Some(10));
        assert_eq!(events[2].total_files, Some(25));

        let stored = store.get("p1").await.unwrap().unwrap();
        assert_eq!(stored.id, result.id);
    }

    #[tokio::test]
    async fn test_zero_files_fails_without_completed_event() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let svc = service(Vec::new(), store.clone(), sink.clone());

        let err = svc.analyze_project("p1", "alice").await.unwrap_err();
        assert!(matches!(err, AnalysisError::NoFiles(_)));
        assert!(err.to_string().contains("no files for analysis"));

        let events = sink.events.lock().unwrap();
        assert!(events.iter().all(|e| e.status != AnalysisStatus::Completed));
        let last = events.last().unwrap();
        assert_eq!(last.status, AnalysisStatus::Failed);
        assert_eq!(last.error.as_deref(), Some(err.to_string().as_str()));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_failing_files_are_dropped_not_fatal() {
        let mut files = js_files(10);
        for file in files.iter_mut().take(3) {
            file.content = None;
        }
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let svc = service(files, store, sink.clone());

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let result = svc.analyze_project("p1", "alice").await.unwrap();

        assert_eq!(result.total_files, 7);
        assert_eq!(result.complexity.distribution.total(), 7);
        let events = sink.events.lock().unwrap();
        let after_batch = &events[2];
        assert_eq!(after_batch.completed_files, Some(10));
        assert_eq!(after_batch.progress, 80);

        let output = logs.contents();
        let warnings: Vec<_> = output
            .lines()
            .filter(|l| l.contains("WARN") && l.contains("skipping file"))
            .collect();
        assert_eq!(warnings.len(), 3);
        for name in ["file0.js", "file1.js", "file2.js"] {
            assert!(warnings.iter().any(|l| l.contains(name)), "no warning for {}", name);
        }
    }

    #[tokio::test]
    async fn test_unauthorized_user_emits_failed() {
        let sink = Arc::new(RecordingSink::default());
        let svc = service(js_files(2), Arc::new(MemoryStore::new()), sink.clone());

        let err = svc.analyze_project("p1", "mallory").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Unauthorized { .. }));
        assert_eq!(
            sink.statuses(),
            vec![(AnalysisStatus::Starting, 0), (AnalysisStatus::Failed, 0)]
        );
    }

    #[tokio::test]
    async fn test_concurrent_runs_last_write_wins() {
        let store = Arc::new(RecordingStore::default());
        let svc = service(js_files(12), store.clone(), Arc::new(NoopProgress));

        let (a, b) = tokio::join!(
            svc.analyze_project("p1", "alice"),
            svc.analyze_project("p1", "alice")
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.id, b.id);
        assert!(a.same_metrics(&b));

        let writes = store.writes.lock().unwrap().clone();
        assert_eq!(writes.len(), 2);
        let stored = store.get("p1").await.unwrap().unwrap();
        assert_eq!(Some(&stored.id.to_string()), writes.last());
    }

    #[tokio::test]
    async fn test_cancelled_before_start_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let sink = Arc::new(RecordingSink::default());
        let svc = service(js_files(3), store.clone(), sink.clone());
        let token = CancellationToken::new();
        token.cancel(None);

        let err = svc
            .analyze_project_with_cancel("p1", "alice", &token)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Cancelled(_)));
        assert!(store.is_empty());
        assert_eq!(sink.statuses().last(), Some(&(AnalysisStatus::Failed, 0)));
    }

    #[tokio::test]
    async fn test_cancel_between_batches() {
        let store = Arc::new(MemoryStore::new());
        let broadcaster = Arc::new(ProgressBroadcaster::default());
        let token = CancellationToken::new();
        let trigger = token.clone();
        broadcaster.on_progress(move |event| {
            if event.completed_files == Some(10) {
                trigger.cancel(Some("test"));
            }
        });

        let svc = service(js_files(30), store.clone(), broadcaster);
        let err = svc
            .analyze_project_with_cancel("p1", "alice", &token)
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Cancelled(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_slow_file_times_out() {
        let mut files = js_files(1);
        files.push(ProjectFile::new(
            "big",
            "big.js",
            "if (a && b) { call(); }\n".repeat(1_000_000),
        ));
        let source = MemoryFileSource::new().with_project("p1", "alice", files);
        let config = AnalyzerConfig {
            file_timeout_ms: Some(200),
            ..Default::default()
        };
        let svc = AnalysisService::new(Arc::new(source), Arc::new(MemoryStore::new()))
            .with_config(&config);

        let result = svc.analyze_project("p1", "alice").await.unwrap();
        assert_eq!(result.total_files, 1);
        assert_eq!(result.function_count, 1);
        assert_eq!(result.total_lines_of_code, 3);
    }

    #[tokio::test]
    async fn test_documentation_summary_splits_imports() {
        let files = vec![
            ProjectFile::new("1", "a.ts", "import x from './x';\nimport y from 'react';\n"),
            ProjectFile::new("2", "b.ts", "import z from '@/lib/z';\n"),
        ];
        let store = Arc::new(MemoryStore::new());
        let svc = service(files, store.clone(), Arc::new(NoopProgress));

        let summary = svc.generate_documentation_summary("p1", "alice").await.unwrap();

        assert_eq!(summary.dependencies.internal, vec!["./x", "@/lib/z"]);
        assert_eq!(summary.dependencies.external, vec!["react"]);
        assert!(store.is_empty());
    }

    #[test]
    fn test_config_applies_batch_size() {
        let config = AnalyzerConfig {
            batch_size: 3,
            ..Default::default()
        };
        let svc = AnalysisService::new(
            Arc::new(MemoryFileSource::new()),
            Arc::new(MemoryStore::new()),
        )
        .with_config(&config);
        assert_eq!(svc.batch_size(), 3);
    }
}
