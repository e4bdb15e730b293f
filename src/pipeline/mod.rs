//! Analysis pipeline: batch orchestration, progress reporting and
//! cancellation.
//!
//! A run moves through `STARTING → IN_PROGRESS → COMPLETED | FAILED`. Files
//! are scanned in sequential batches; within a batch every file runs
//! concurrently on tokio's blocking pool. A failing file is logged and left
//! out of the aggregate, it never fails the run.

mod cancel;
mod orchestrator;
mod progress;

pub use cancel::CancellationToken;
pub use orchestrator::AnalysisService;
pub use progress::{
    batch_progress, AnalysisStatus, NoopProgress, ProgressBroadcaster, ProgressCallback,
    ProgressEvent, ProgressSink, AGGREGATED_PROGRESS, BATCH_PROGRESS_SPAN, SETUP_PROGRESS,
};
