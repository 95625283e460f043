//! In-memory StatusHistoryStore.
//!
//! Can be built unavailable to exercise the best-effort history contract
//! without a missing table.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, TenantId};
use crate::domain::tenant::StatusHistoryEntry;
use crate::ports::{HistoryAvailability, StatusHistoryStore};

pub struct InMemoryStatusHistoryStore {
    entries: RwLock<Vec<StatusHistoryEntry>>,
    availability: HistoryAvailability,
}

impl InMemoryStatusHistoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            availability: HistoryAvailability::Available,
        }
    }

    /// A store that reports itself unavailable and rejects appends.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            availability: HistoryAvailability::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// Every entry in append order (for assertions).
    pub async fn entries(&self) -> Vec<StatusHistoryEntry> {
        self.entries.read().await.clone()
    }
}

impl Default for InMemoryStatusHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusHistoryStore for InMemoryStatusHistoryStore {
    async fn availability(&self) -> HistoryAvailability {
        self.availability.clone()
    }

    async fn append(&self, entry: &StatusHistoryEntry) -> Result<(), DomainError> {
        if let HistoryAvailability::Unavailable { reason } = &self.availability {
            return Err(DomainError::database(format!("history store unavailable: {}", reason)));
        }
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn list_recent(
        &self,
        tenant_id: &TenantId,
        limit: u32,
    ) -> Result<Vec<StatusHistoryEntry>, DomainError> {
        let entries = self.entries.read().await;
        // Append order breaks ties between entries with the same timestamp.
        let mut matching: Vec<(usize, &StatusHistoryEntry)> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| &e.tenant_id == tenant_id)
            .collect();
        matching.sort_by(|(ia, a), (ib, b)| b.created_at.cmp(&a.created_at).then(ib.cmp(ia)));
        Ok(matching
            .into_iter()
            .take(limit as usize)
            .map(|(_, e)| e.clone())
            .collect())
    }
}
