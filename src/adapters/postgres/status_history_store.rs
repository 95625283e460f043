//! PostgreSQL implementation of StatusHistoryStore.
//!
//! Availability is probed against the catalog so a deployment without the
//! history table degrades to "no history" instead of failing appends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

use super::tenant_repository::parse_location_status;
use crate::domain::foundation::{
    DomainError, ErrorCode, HistoryEntryId, TenantId, Timestamp, UserId,
};
use crate::domain::tenant::StatusHistoryEntry;
use crate::ports::{HistoryAvailability, StatusHistoryStore};

const HISTORY_TABLE: &str = "location_status_history";

pub struct PostgresStatusHistoryStore {
    pool: PgPool,
    /// Set once the table has been seen; tables are not dropped at runtime.
    confirmed: AtomicBool,
}

impl PostgresStatusHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            confirmed: AtomicBool::new(false),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct HistoryRow {
    id: Uuid,
    tenant_id: Uuid,
    old_status: String,
    new_status: String,
    changed_by: String,
    reason: Option<String>,
    reopening_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for StatusHistoryEntry {
    type Error = DomainError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(StatusHistoryEntry {
            id: HistoryEntryId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            old_status: parse_location_status(&row.old_status)?,
            new_status: parse_location_status(&row.new_status)?,
            changed_by: UserId::new(row.changed_by).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid changed_by: {}", e))
            })?,
            reason: row.reason,
            reopening_date: row.reopening_date.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl StatusHistoryStore for PostgresStatusHistoryStore {
    async fn availability(&self) -> HistoryAvailability {
        if self.confirmed.load(Ordering::Relaxed) {
            return HistoryAvailability::Available;
        }

        let probe: Result<(bool,), sqlx::Error> =
            sqlx::query_as("SELECT to_regclass($1) IS NOT NULL")
                .bind(HISTORY_TABLE)
                .fetch_one(&self.pool)
                .await;

        match probe {
            Ok((true,)) => {
                self.confirmed.store(true, Ordering::Relaxed);
                HistoryAvailability::Available
            }
            Ok((false,)) => HistoryAvailability::Unavailable {
                reason: format!("table {} does not exist", HISTORY_TABLE),
            },
            Err(e) => HistoryAvailability::Unavailable {
                reason: format!("availability probe failed: {}", e),
            },
        }
    }

    async fn append(&self, entry: &StatusHistoryEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO location_status_history (
                id, tenant_id, old_status, new_status, changed_by, reason, reopening_date, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.tenant_id.as_uuid())
        .bind(entry.old_status.as_str())
        .bind(entry.new_status.as_str())
        .bind(entry.changed_by.as_str())
        .bind(&entry.reason)
        .bind(entry.reopening_date.map(|t| *t.as_datetime()))
        .bind(entry.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to append status history: {}", e)))?;

        Ok(())
    }

    async fn list_recent(
        &self,
        tenant_id: &TenantId,
        limit: u32,
    ) -> Result<Vec<StatusHistoryEntry>, DomainError> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            r#"
            SELECT id, tenant_id, old_status, new_status, changed_by, reason, reopening_date, created_at
            FROM location_status_history
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list status history: {}", e)))?;

        rows.into_iter().map(StatusHistoryEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tenant::LocationStatus;

    #[test]
    fn row_converts_to_entry() {
        let row = HistoryRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            old_status: "active".to_string(),
            new_status: "closed".to_string(),
            changed_by: "owner-1".to_string(),
            reason: Some("Renovation".to_string()),
            reopening_date: None,
            created_at: Utc::now(),
        };

        let entry = StatusHistoryEntry::try_from(row).unwrap();

        assert_eq!(entry.old_status, LocationStatus::Active);
        assert_eq!(entry.new_status, LocationStatus::Closed);
        assert_eq!(entry.changed_by.as_str(), "owner-1");
    }

    #[test]
    fn blank_actor_is_rejected() {
        let row = HistoryRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            old_status: "active".to_string(),
            new_status: "inactive".to_string(),
            changed_by: String::new(),
            reason: None,
            reopening_date: None,
            created_at: Utc::now(),
        };

        assert!(StatusHistoryEntry::try_from(row).is_err());
    }
}
