//! PostgreSQL implementation of TenantRepository.
//!
//! The status change is one conditional `UPDATE ... RETURNING`, guarded on
//! the status the change was planned against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entitlement::TierKey;
use crate::domain::foundation::{
    DomainError, ErrorCode, OrganizationId, TenantId, Timestamp, UserId,
};
use crate::domain::tenant::{
    LocationStatus, LocationStatusChange, Provisioner, SubscriptionStatus, Tenant,
};
use crate::ports::{StatusUpdateOutcome, TenantRepository};

const TENANT_COLUMNS: &str = r#"
    id, owner_id, organization_id, name, tier, subscription_status, trial_ends_at,
    external_subscription_ref, location_status, status_changed_at, status_changed_by,
    reopening_date, closure_reason, sku_quota, skus_used_this_period, provisioned_by,
    created_at, updated_at
"#;

/// PostgreSQL implementation of the TenantRepository port.
pub struct PostgresTenantRepository {
    pool: PgPool,
}

impl PostgresTenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a tenant.
#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: Uuid,
    owner_id: String,
    organization_id: Option<Uuid>,
    name: String,
    tier: String,
    subscription_status: String,
    trial_ends_at: Option<DateTime<Utc>>,
    external_subscription_ref: Option<String>,
    location_status: String,
    status_changed_at: Option<DateTime<Utc>>,
    status_changed_by: Option<String>,
    reopening_date: Option<DateTime<Utc>>,
    closure_reason: Option<String>,
    sku_quota: Option<i32>,
    skus_used_this_period: i32,
    provisioned_by: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = DomainError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        Ok(Tenant {
            id: TenantId::from_uuid(row.id),
            owner_id: parse_user_id("owner_id", row.owner_id)?,
            organization_id: row.organization_id.map(OrganizationId::from_uuid),
            name: row.name,
            tier: parse_tier(row.id, row.tier),
            subscription_status: parse_subscription_status(&row.subscription_status)?,
            trial_ends_at: row.trial_ends_at.map(Timestamp::from_datetime),
            external_subscription_ref: row.external_subscription_ref,
            location_status: parse_location_status(&row.location_status)?,
            status_changed_at: row.status_changed_at.map(Timestamp::from_datetime),
            status_changed_by: row
                .status_changed_by
                .map(|u| parse_user_id("status_changed_by", u))
                .transpose()?,
            reopening_date: row.reopening_date.map(Timestamp::from_datetime),
            closure_reason: row.closure_reason,
            sku_quota: row.sku_quota.map(to_u32).transpose()?,
            skus_used_this_period: to_u32(row.skus_used_this_period)?,
            provisioned_by: Provisioner::parse(&row.provisioned_by).ok_or_else(|| {
                corrupt("provisioned_by", format!("unknown value '{}'", row.provisioned_by))
            })?,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid {} in tenants row: {}", column, detail),
    )
}

/// A malformed stored key degrades the tenant instead of failing the read.
fn parse_tier(tenant_id: Uuid, raw: String) -> TierKey {
    TierKey::new(raw.as_str()).unwrap_or_else(|e| {
        tracing::warn!(
            tenant_id = %tenant_id,
            tier = %raw,
            error = %e,
            "Stored tier key is malformed, resolving to most restrictive tier"
        );
        TierKey::unrecognized()
    })
}

fn parse_user_id(column: &str, raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| corrupt(column, e))
}

pub(super) fn parse_location_status(s: &str) -> Result<LocationStatus, DomainError> {
    LocationStatus::parse(s).ok_or_else(|| corrupt("location_status", format!("unknown value '{}'", s)))
}

fn parse_subscription_status(s: &str) -> Result<SubscriptionStatus, DomainError> {
    SubscriptionStatus::parse(s)
        .ok_or_else(|| corrupt("subscription_status", format!("unknown value '{}'", s)))
}

fn to_u32(value: i32) -> Result<u32, DomainError> {
    u32::try_from(value).map_err(|_| corrupt("quota", format!("negative value {}", value)))
}

fn to_i32(value: u32) -> Result<i32, DomainError> {
    i32::try_from(value).map_err(|_| {
        DomainError::validation("sku_quota", format!("{} does not fit the column", value))
    })
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl TenantRepository for PostgresTenantRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> =
            sqlx::query_as(&format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("find tenant", e))?;

        row.map(Tenant::try_from).transpose()
    }

    async fn save(&self, tenant: &Tenant) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tenants (
                id, owner_id, organization_id, name, tier, subscription_status, trial_ends_at,
                external_subscription_ref, location_status, status_changed_at, status_changed_by,
                reopening_date, closure_reason, sku_quota, skus_used_this_period, provisioned_by,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(tenant.owner_id.as_str())
        .bind(tenant.organization_id.map(|o| *o.as_uuid()))
        .bind(&tenant.name)
        .bind(tenant.tier.as_str())
        .bind(tenant.subscription_status.as_str())
        .bind(tenant.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(&tenant.external_subscription_ref)
        .bind(tenant.location_status.as_str())
        .bind(tenant.status_changed_at.map(|t| *t.as_datetime()))
        .bind(tenant.status_changed_by.as_ref().map(UserId::as_str))
        .bind(tenant.reopening_date.map(|t| *t.as_datetime()))
        .bind(&tenant.closure_reason)
        .bind(tenant.sku_quota.map(to_i32).transpose()?)
        .bind(to_i32(tenant.skus_used_this_period)?)
        .bind(tenant.provisioned_by.as_str())
        .bind(tenant.created_at.as_datetime())
        .bind(tenant.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("tenants_pkey") {
                    return DomainError::validation("id", format!("Tenant {} already exists", tenant.id));
                }
            }
            db_error("save tenant", e)
        })?;

        Ok(())
    }

    async fn update_location_status(
        &self,
        change: &LocationStatusChange,
    ) -> Result<StatusUpdateOutcome, DomainError> {
        let updated: Option<TenantRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tenants SET
                location_status = $2,
                status_changed_at = $3,
                status_changed_by = $4,
                reopening_date = $5,
                closure_reason = $6,
                updated_at = $3
            WHERE id = $1 AND location_status = $7
            RETURNING {}
            "#,
            TENANT_COLUMNS
        ))
        .bind(change.tenant_id.as_uuid())
        .bind(change.to.as_str())
        .bind(change.changed_at.as_datetime())
        .bind(change.changed_by.as_str())
        .bind(change.stored_reopening_date().map(|t| *t.as_datetime()))
        .bind(change.closure_reason())
        .bind(change.from.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("update location status", e))?;

        if let Some(row) = updated {
            return Ok(StatusUpdateOutcome::Updated(Tenant::try_from(row)?));
        }

        // Nothing matched: either the row is gone or its status moved.
        let current: Option<(String,)> =
            sqlx::query_as("SELECT location_status FROM tenants WHERE id = $1")
                .bind(change.tenant_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("read location status", e))?;

        match current {
            None => Ok(StatusUpdateOutcome::NotFound),
            Some((status,)) => Ok(StatusUpdateOutcome::Conflict {
                current: parse_location_status(&status)?,
            }),
        }
    }

    async fn save_subscription_state(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tenants SET
                tier = $2,
                subscription_status = $3,
                trial_ends_at = $4,
                sku_quota = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(tenant.id.as_uuid())
        .bind(tenant.tier.as_str())
        .bind(tenant.subscription_status.as_str())
        .bind(tenant.trial_ends_at.map(|t| *t.as_datetime()))
        .bind(tenant.sku_quota.map(to_i32).transpose()?)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("write back subscription state", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::TenantNotFound,
                format!("Tenant {} not found", tenant.id),
            ));
        }

        Ok(())
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tenant>, DomainError> {
        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tenants WHERE owner_id = $1 ORDER BY created_at ASC",
            TENANT_COLUMNS
        ))
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list tenants by owner", e))?;

        rows.into_iter().map(Tenant::try_from).collect()
    }

    async fn count_by_owner(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenants WHERE owner_id = $1")
            .bind(owner_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count tenants", e))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn count_by_owner_provisioned_by(
        &self,
        owner_id: &UserId,
        provisioned_by: Provisioner,
    ) -> Result<u32, DomainError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tenants WHERE owner_id = $1 AND provisioned_by = $2",
        )
        .bind(owner_id.as_str())
        .bind(provisioned_by.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("count provisioned tenants", e))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
