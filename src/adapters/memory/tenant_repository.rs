//! In-memory TenantRepository.
//!
//! Used by tests and local wiring. The conditional status update holds the
//! write lock for the whole check-and-set, matching the single-row
//! `UPDATE ... WHERE location_status = $from` semantics of the Postgres
//! adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, TenantId, UserId};
use crate::domain::tenant::{LocationStatusChange, Provisioner, Tenant};
use crate::ports::{StatusUpdateOutcome, TenantRepository};

/// Tenant store backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryTenantRepository {
    tenants: RwLock<HashMap<TenantId, Tenant>>,
}

impl InMemoryTenantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tenant, replacing any existing row with the same id.
    pub async fn insert(&self, tenant: Tenant) {
        self.tenants.write().await.insert(tenant.id, tenant);
    }

    /// Current row, bypassing the port (for assertions).
    pub async fn get(&self, id: &TenantId) -> Option<Tenant> {
        self.tenants.read().await.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.tenants.read().await.len()
    }
}

#[async_trait]
impl TenantRepository for InMemoryTenantRepository {
    async fn find_by_id(&self, id: &TenantId) -> Result<Option<Tenant>, DomainError> {
        Ok(self.tenants.read().await.get(id).cloned())
    }

    async fn save(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut tenants = self.tenants.write().await;
        if tenants.contains_key(&tenant.id) {
            return Err(DomainError::validation(
                "id",
                format!("Tenant {} already exists", tenant.id),
            ));
        }
        tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    async fn update_location_status(
        &self,
        change: &LocationStatusChange,
    ) -> Result<StatusUpdateOutcome, DomainError> {
        let mut tenants = self.tenants.write().await;
        let Some(tenant) = tenants.get_mut(&change.tenant_id) else {
            return Ok(StatusUpdateOutcome::NotFound);
        };
        if tenant.location_status != change.from {
            return Ok(StatusUpdateOutcome::Conflict {
                current: tenant.location_status,
            });
        }
        change.apply_to(tenant);
        Ok(StatusUpdateOutcome::Updated(tenant.clone()))
    }

    async fn save_subscription_state(&self, tenant: &Tenant) -> Result<(), DomainError> {
        let mut tenants = self.tenants.write().await;
        match tenants.get_mut(&tenant.id) {
            Some(row) => {
                row.tier = tenant.tier.clone();
                row.subscription_status = tenant.subscription_status;
                row.trial_ends_at = tenant.trial_ends_at;
                row.sku_quota = tenant.sku_quota;
                row.updated_at = tenant.updated_at;
                Ok(())
            }
            None => Err(DomainError::database(format!(
                "Tenant {} not found for subscription write-back",
                tenant.id
            ))),
        }
    }

    async fn list_by_owner(&self, owner_id: &UserId) -> Result<Vec<Tenant>, DomainError> {
        let mut owned: Vec<Tenant> = self
            .tenants
            .read()
            .await
            .values()
            .filter(|t| &t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by_key(|t| t.created_at);
        Ok(owned)
    }

    async fn count_by_owner(&self, owner_id: &UserId) -> Result<u32, DomainError> {
        let count = self
            .tenants
            .read()
            .await
            .values()
            .filter(|t| &t.owner_id == owner_id)
            .count();
        Ok(count as u32)
    }

    async fn count_by_owner_provisioned_by(
        &self,
        owner_id: &UserId,
        provisioned_by: Provisioner,
    ) -> Result<u32, DomainError> {
        let count = self
            .tenants
            .read()
            .await
            .values()
            .filter(|t| &t.owner_id == owner_id && t.provisioned_by == provisioned_by)
            .count();
        Ok(count as u32)
    }
}
