//! Progress events emitted during an analysis run.
//!
//! Delivery is best-effort. A sink that drops events, or a broadcast channel
//! with no subscribers, never affects the stored result.

use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use tokio::sync::broadcast;

/// Share of the progress bar reserved for setup.
pub const SETUP_PROGRESS: u8 = 10;
/// Share of the progress bar covered by file batches.
pub const BATCH_PROGRESS_SPAN: f64 = 70.0;
/// Progress reported once aggregation is done, before the storage write.
pub const AGGREGATED_PROGRESS: u8 = 90;

/// Lifecycle of an analysis run.
///
/// `Starting` → `InProgress`* → `Completed` | `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Starting,
    InProgress,
    Completed,
    Failed,
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Starting => write!(f, "STARTING"),
            AnalysisStatus::InProgress => write!(f, "IN_PROGRESS"),
            AnalysisStatus::Completed => write!(f, "COMPLETED"),
            AnalysisStatus::Failed => write!(f, "FAILED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub project_id: String,
    pub user_id: String,
    pub status: AnalysisStatus,
    /// Percentage, 0 to 100.
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_files: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_files: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    pub fn new(project_id: &str, user_id: &str, status: AnalysisStatus, progress: u8) -> Self {
        Self {
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
            status,
            progress,
            completed_files: None,
            total_files: None,
            error: None,
        }
    }

    pub fn with_files(mut self, completed: usize, total: usize) -> Self {
        self.completed_files = Some(completed);
        self.total_files = Some(total);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Progress after `processed` of `total` files: `10 + processed / total * 70`.
pub fn batch_progress(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return SETUP_PROGRESS;
    }
    let ratio = processed.min(total) as f64 / total as f64;
    (f64::from(SETUP_PROGRESS) + ratio * BATCH_PROGRESS_SPAN).round() as u8
}

/// Fire-and-forget receiver of progress events.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: &ProgressEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn emit(&self, _event: &ProgressEvent) {}
}

/// Progress callback function type
pub type ProgressCallback = Box<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Delivers events to registered in-process callbacks and to a broadcast
/// channel for any number of async subscribers.
pub struct ProgressBroadcaster {
    sender: broadcast::Sender<ProgressEvent>,
    callbacks: RwLock<Vec<ProgressCallback>>,
}

impl ProgressBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to the broadcast stream. Slow subscribers may lag and miss
    /// events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.sender.subscribe()
    }

    /// Register an in-process callback.
    pub fn on_progress<F>(&self, callback: F)
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        if let Ok(mut callbacks) = self.callbacks.write() {
            callbacks.push(Box::new(callback));
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ProgressBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}

impl ProgressSink for ProgressBroadcaster {
    fn emit(&self, event: &ProgressEvent) {
        if let Ok(callbacks) = self.callbacks.read() {
            for callback in callbacks.iter() {
                callback(event);
            }
        }
        // No subscribers is not an error.
        let _ = self.sender.send(event.clone());
    }
}
