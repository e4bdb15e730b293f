//! Cooperative cancellation for analysis runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Shared cancellation flag.
///
/// Clones observe the same flag. The pipeline checks it between batches and
/// before writing to storage; a file already being scanned runs to the end.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    reason: Arc<Mutex<Option<String>>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation, optionally recording why.
    pub fn cancel(&self, reason: Option<&str>) {
        if let Some(reason) = reason {
            if let Ok(mut slot) = self.reason.lock() {
                *slot = Some(reason.to_string());
            }
        }
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn reason(&self) -> Option<String> {
        self.reason.lock().ok().and_then(|r| r.clone())
    }
}
