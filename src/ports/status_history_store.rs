//! Status history store port.
//!
//! The history table may not be provisioned in every environment. Instead
//! of discovering that through a failed insert, the store reports its
//! availability up front and the recorder skips the append.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::tenant::StatusHistoryEntry;

/// Whether the history store can take writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAvailability {
    Available,
    Unavailable { reason: String },
}

impl HistoryAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, HistoryAvailability::Available)
    }
}

/// Append-only store of status transitions.
#[async_trait]
pub trait StatusHistoryStore: Send + Sync {
    /// Report whether appends can succeed.
    async fn availability(&self) -> HistoryAvailability;

    /// Append one entry. Entries are never updated or deleted.
    async fn append(&self, entry: &StatusHistoryEntry) -> Result<(), DomainError>;

    /// Most recent entries for a tenant, newest first.
    async fn list_recent(
        &self,
        tenant_id: &TenantId,
        limit: u32,
    ) -> Result<Vec<StatusHistoryEntry>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_history_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn StatusHistoryStore) {}
    }

    #[test]
    fn unavailable_is_not_available() {
        let availability = HistoryAvailability::Unavailable {
            reason: "relation does not exist".to_string(),
        };
        assert!(!availability.is_available());
        assert!(HistoryAvailability::Available.is_available());
    }
}
