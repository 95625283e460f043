//! Side effect dispatcher port.
//!
//! The primary path hands post-commit work to a dispatcher and moves on.
//! Submission never blocks and never fails the caller.

use crate::domain::tenant::StatusHistoryEntry;

use super::DirectorySyncRequest;

/// Post-commit work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffectJob {
    /// Append one history entry.
    RecordHistory(StatusHistoryEntry),
    /// Mirror the new status to the directory.
    SyncDirectory(DirectorySyncRequest),
}

impl SideEffectJob {
    pub fn kind(&self) -> &'static str {
        match self {
            SideEffectJob::RecordHistory(_) => "record_history",
            SideEffectJob::SyncDirectory(_) => "sync_directory",
        }
    }
}

/// Why a job was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("side effect queue is full")]
    QueueFull,
    #[error("side effect queue is closed")]
    Closed,
}

/// Non-blocking submission of side effect jobs.
pub trait SideEffectDispatcher: Send + Sync {
    /// Enqueue a job. Returns immediately.
    fn dispatch(&self, job: SideEffectJob) -> Result<(), DispatchError>;
}
