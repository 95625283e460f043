//! Side effect failures.
//!
//! Isolated at the side effect boundary: logged with enough context to
//! re-drive by hand, never returned to the caller of the primary operation.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SideEffectError {
    #[error("history store unavailable: {reason}")]
    HistoryUnavailable { reason: String },

    #[error("history append failed: {0}")]
    HistoryAppend(String),

    #[error("directory sync failed: {0}")]
    DirectorySync(String),

    #[error("{job} timed out after {after_ms}ms")]
    TimedOut { job: &'static str, after_ms: u64 },
}

impl SideEffectError {
    pub fn code(&self) -> crate::domain::foundation::ErrorCode {
        crate::domain::foundation::ErrorCode::SideEffectFailed
    }
}
