//! Tenant repository port.
//!
//! Defines the contract for persisting tenants and for the single-row status
//! update the lifecycle path relies on.
//!
//! # Design
//!
//! - **Atomic status write**: `update_location_status` is one conditional
//!   `UPDATE ... RETURNING`, guarded on the status the change was planned from
//! - **Counts are advisory**: creation limits read counts immediately before
//!   inserting; concurrent bursts from one owner may overshoot

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, TenantId, UserId};
use crate::domain::tenant::{LocationStatus, LocationStatusChange, Provisioner, Tenant};

/// Result of the conditional status update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdateOutcome {
    /// Row written; the returned tenant reflects the change.
    Updated(Tenant),
    /// No row with that id.
    NotFound,
    /// The row's status moved since the change was planned.
    Conflict { current: LocationStatus },
}

/// Repository port for tenant persistence.
#[async_trait]
pub trait TenantRepository: Send + Sync {
    /// Find a tenant by id. Returns `None` if not found.
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError>;

    /// Insert a new tenant.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a tenant with the same id exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, tenant: &Tenant) -> Result<(), DomainError>;

    /// Apply a status change to one row, only if its status is still
    /// `change.from`.
    async fn update_location_status(
        &self,
        change: &LocationStatusChange,
    ) -> Result<StatusUpdateOutcome, DomainError>;

    /// Write back tier, subscription status and trial window.
    ///
    /// Used by the trial reconciler's write-on-read.
    async fn save_subscription_state(&self, tenant: &Tenant) -> Result<(), DomainError>;

    /// All tenants owned by a user.
    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tenant>, DomainError>;

    /// Number of tenants owned by a user.
    async fn count_by_owner(&self, owner_id: &UserId) -> Result<u32, DomainError>;

    /// Number of tenants owned by a user that a given provisioner created.
    async fn count_by_owner_provisioned_by(
        &self,
        owner_id: &UserId,
        provisioned_by: Provisioner,
    ) -> Result<u32, DomainError>;
}
