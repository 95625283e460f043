//! Append-only status history.

use serde::{Deserialize, Serialize};

use super::{LocationStatus, LocationStatusChange};
use crate::domain::foundation::{HistoryEntryId, TenantId, Timestamp, UserId};

/// One committed location status transition.
///
/// Written once per successful change and never mutated. The history store
/// is best-effort, so a transition may exist without an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub id: HistoryEntryId,
    pub tenant_id: TenantId,
    pub old_status: LocationStatus,
    pub new_status: LocationStatus,
    pub changed_by: UserId,
    pub reason: Option<String>,
    pub reopening_date: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl StatusHistoryEntry {
    pub fn from_change(change: &LocationStatusChange) -> Self {
        Self {
            id: HistoryEntryId::new(),
            tenant_id: change.tenant_id,
            old_status: change.from,
            new_status: change.to,
            changed_by: change.changed_by.clone(),
            reason: change.reason.clone(),
            reopening_date: change.stored_reopening_date(),
            created_at: change.changed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_mirrors_change() {
        let changed_at = Timestamp::now();
        let change = LocationStatusChange {
            tenant_id: TenantId::new(),
            from: LocationStatus::Active,
            to: LocationStatus::Closed,
            changed_by: UserId::new("admin-7").unwrap(),
            changed_at,
            reason: Some("Flood damage".to_string()),
            reopening_date: Some(changed_at.add_days(30)),
        };

        let entry = StatusHistoryEntry::from_change(&change);

        assert_eq!(entry.tenant_id, change.tenant_id);
        assert_eq!(entry.old_status, LocationStatus::Active);
        assert_eq!(entry.new_status, LocationStatus::Closed);
        assert_eq!(entry.reason.as_deref(), Some("Flood damage"));
        assert_eq!(entry.reopening_date, change.reopening_date);
        assert_eq!(entry.created_at, changed_at);
    }

    #[test]
    fn entry_keeps_reason_when_reopening() {
        let change = LocationStatusChange {
            tenant_id: TenantId::new(),
            from: LocationStatus::Closed,
            to: LocationStatus::Active,
            changed_by: UserId::new("owner-1").unwrap(),
            changed_at: Timestamp::now(),
            reason: Some("Repairs done".to_string()),
            reopening_date: None,
        };

        let entry = StatusHistoryEntry::from_change(&change);
        assert_eq!(entry.reason.as_deref(), Some("Repairs done"));
        assert!(entry.reopening_date.is_none());
    }
}
