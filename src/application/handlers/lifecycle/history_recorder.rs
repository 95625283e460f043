//! HistoryRecorder - best-effort status history.
//!
//! One attempt per entry. The store's availability is checked first so an
//! unprovisioned history table is a normal, logged skip rather than an
//! insert failure. Nothing here retries or propagates.

use std::sync::Arc;

use super::SideEffectError;
use crate::domain::tenant::StatusHistoryEntry;
use crate::ports::{HistoryAvailability, StatusHistoryStore};

/// What happened to one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded,
    /// Store reported itself unavailable; nothing was attempted.
    Skipped(SideEffectError),
    Failed(SideEffectError),
}

pub struct HistoryRecorder {
    store: Arc<dyn StatusHistoryStore>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn StatusHistoryStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, entry: &StatusHistoryEntry) -> RecordOutcome {
        if let HistoryAvailability::Unavailable { reason } = self.store.availability().await {
            tracing::warn!(
                tenant_id = %entry.tenant_id,
                old_status = %entry.old_status,
                new_status = %entry.new_status,
                reason = %reason,
                "Status history unavailable, entry not recorded"
            );
            return RecordOutcome::Skipped(SideEffectError::HistoryUnavailable { reason });
        }

        match self.store.append(entry).await {
            Ok(()) => {
                tracing::debug!(
                    tenant_id = %entry.tenant_id,
                    entry_id = %entry.id,
                    "Recorded status history entry"
                );
                RecordOutcome::Recorded
            }
            Err(err) => {
                tracing::error!(
                    tenant_id = %entry.tenant_id,
                    old_status = %entry.old_status,
                    new_status = %entry.new_status,
                    changed_by = %entry.changed_by,
                    error = %err,
                    "Failed to record status history"
                );
                RecordOutcome::Failed(SideEffectError::HistoryAppend(err.to_string()))
            }
        }
    }
}
