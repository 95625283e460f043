//! Location lifecycle handlers.
//!
//! The primary path (change, preview, history read) plus the side-effect
//! boundary: history recording, directory propagation and the worker that
//! drains the queue.

mod change_status;
mod directory_sync_coordinator;
mod errors;
mod get_status_history;
mod history_recorder;
mod preview_status_change;
mod side_effect_worker;

pub use change_status::{ChangeStatusCommand, ChangeStatusHandler, StatusChangeOutcome};
pub use directory_sync_coordinator::{DirectorySyncCoordinator, SyncOutcome};
pub use errors::SideEffectError;
pub use get_status_history::{
    GetStatusHistoryHandler, GetStatusHistoryQuery, GetStatusHistoryResult, MAX_HISTORY_LIMIT,
};
pub use history_recorder::{HistoryRecorder, RecordOutcome};
pub use preview_status_change::{
    PreviewStatusChangeHandler, PreviewStatusChangeQuery, PreviewStatusChangeResult,
};
pub use side_effect_worker::{JobOutcome, SideEffectWorker, SideEffectWorkerConfig};
