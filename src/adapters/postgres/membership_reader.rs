//! PostgreSQL implementation of MembershipReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::access::{Membership, PlatformRole, TenantRole};
use crate::domain::foundation::{DomainError, ErrorCode, TenantId, Timestamp, UserId};
use crate::ports::MembershipReader;

pub struct PostgresMembershipReader {
    pool: PgPool,
}

impl PostgresMembershipReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MembershipRow {
    user_id: String,
    tenant_id: Uuid,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = DomainError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            tenant_id: TenantId::from_uuid(row.tenant_id),
            role: TenantRole::parse(&row.role).ok_or_else(|| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid tenant role: {}", row.role))
            })?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_platform_role(raw: &str) -> Result<PlatformRole, DomainError> {
    PlatformRole::parse(raw).ok_or_else(|| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid platform role: {}", raw))
    })
}

#[async_trait]
impl MembershipReader for PostgresMembershipReader {
    async fn find_membership(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<Option<Membership>, DomainError> {
        let row: Option<MembershipRow> = sqlx::query_as(
            r#"
            SELECT user_id, tenant_id, role, created_at
            FROM tenant_memberships
            WHERE user_id = $1 AND tenant_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(tenant_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to find membership: {}", e)))?;

        row.map(Membership::try_from).transpose()
    }

    async fn platform_role(&self, user_id: &UserId) -> Result<Option<PlatformRole>, DomainError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT role FROM platform_roles WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to find platform role: {}", e)))?;

        row.map(|(role,)| parse_platform_role(&role)).transpose()
    }
}
