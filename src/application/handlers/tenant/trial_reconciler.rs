//! TrialReconciler - trial expiry on the tenant read path.
//!
//! Every tenant read goes through here. Reconciled state is written back
//! immediately (write-on-read). A failed write-back is logged and the
//! reconciled tenant is still returned; reconciliation never raises.

use std::sync::Arc;

use crate::domain::foundation::{TenantId, Timestamp, UserId};
use crate::domain::tenant::{Tenant, TenantError, TrialExpirationEvaluator, TrialReconciliation};
use crate::ports::TenantRepository;

pub struct TrialReconciler {
    repository: Arc<dyn TenantRepository>,
    evaluator: TrialExpirationEvaluator,
}

impl TrialReconciler {
    pub fn new(repository: Arc<dyn TenantRepository>, evaluator: TrialExpirationEvaluator) -> Self {
        Self {
            repository,
            evaluator,
        }
    }

    /// Reconcile an already-loaded tenant and persist any change.
    pub async fn reconcile(&self, tenant: Tenant) -> Tenant {
        self.reconcile_at(tenant, Timestamp::now()).await
    }

    pub async fn reconcile_at(&self, tenant: Tenant, now: Timestamp) -> Tenant {
        let (tenant, outcome) = self.evaluator.reconcile(tenant, now);

        match &outcome {
            TrialReconciliation::Unchanged => return tenant,
            TrialReconciliation::Backfilled { trial_ends_at } => {
                tracing::info!(
                    tenant_id = %tenant.id,
                    trial_ends_at = %trial_ends_at,
                    "Backfilled missing trial window"
                );
            }
            TrialReconciliation::Expired { downgraded_from } => {
                tracing::info!(
                    tenant_id = %tenant.id,
                    tier = %tenant.tier,
                    downgraded_from = ?downgraded_from.as_ref().map(|t| t.as_str()),
                    "Trial expired"
                );
            }
        }

        if let Err(err) = self.repository.save_subscription_state(&tenant).await {
            tracing::warn!(
                tenant_id = %tenant.id,
                error = %err,
                "Trial reconciliation write-back failed; returning reconciled tenant"
            );
        }
        tenant
    }

    /// Load a tenant by id and reconcile it.
    pub async fn load(&self, id: &TenantId) -> Result<Tenant, TenantError> {
        let tenant = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TenantError::NotFound(*id))?;
        Ok(self.reconcile(tenant).await)
    }

    /// Every tenant of an owner, each reconciled.
    pub async fn load_owned(&self, owner_id: &UserId) -> Result<Vec<Tenant>, TenantError> {
        let tenants = self.repository.list_by_owner(owner_id).await?;
        let mut reconciled = Vec::with_capacity(tenants.len());
        for tenant in tenants {
            reconciled.push(self.reconcile(tenant).await);
        }
        Ok(reconciled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTenantRepository;
    use crate::domain::entitlement::catalog::test_support::{key, standard_table};
    use crate::domain::foundation::DomainError;
    use crate::domain::tenant::{
        LocationStatusChange, Provisioner, SubscriptionStatus,
    };
    use crate::ports::StatusUpdateOutcome;
    use async_trait::async_trait;

    fn trial_tenant(tier: &str, trial_ends_at: Option<Timestamp>) -> Tenant {
        let table = standard_table();
        let mut tenant = Tenant::start_trial(
            UserId::new("owner-1").unwrap(),
            None,
            "Corner Books",
            table.resolve(&key(tier)),
            table.trial(),
            Provisioner::Owner,
            Timestamp::now().minus_days(20),
        )
        .unwrap();
        tenant.trial_ends_at = trial_ends_at;
        tenant
    }

    fn reconciler(repo: Arc<dyn TenantRepository>) -> TrialReconciler {
        TrialReconciler::new(repo, TrialExpirationEvaluator::new(Arc::new(standard_table())))
    }

    #[tokio::test]
    async fn load_persists_expiry() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        let tenant = trial_tenant("professional", Some(Timestamp::now().minus_days(1)));
        repo.insert(tenant.clone()).await;

        let loaded = reconciler(repo.clone()).load(&tenant.id).await.unwrap();

        assert_eq!(loaded.subscription_status, SubscriptionStatus::Expired);
        let stored = repo.get(&tenant.id).await.unwrap();
        assert_eq!(stored.subscription_status, SubscriptionStatus::Expired);
        assert_eq!(stored.tier, key("discovery"));
        assert!(stored.trial_ends_at.is_none());
    }

    #[tokio::test]
    async fn load_persists_backfill() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        let tenant = trial_tenant("storefront", None);
        repo.insert(tenant.clone()).await;

        let loaded = reconciler(repo.clone()).load(&tenant.id).await.unwrap();

        assert!(loaded.trial_ends_at.is_some());
        assert_eq!(repo.get(&tenant.id).await.unwrap().trial_ends_at, loaded.trial_ends_at);
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        let id = TenantId::new();
        let err = reconciler(repo).load(&id).await.unwrap_err();
        assert_eq!(err, TenantError::NotFound(id));
    }

    /// Repository whose write-back always fails.
    struct ReadOnlyRepository {
        tenant: Tenant,
    }

    #[async_trait]
    impl TenantRepository for ReadOnlyRepository {
        async fn find_by_id(&self, _id: &TenantId) -> Result<Option<Tenant>, DomainError> {
            Ok(Some(self.tenant.clone()))
        }
        async fn save(&self, _tenant: &Tenant) -> Result<(), DomainError> {
            Err(DomainError::database("read only"))
        }
        async fn update_location_status(
            &self,
            _change: &LocationStatusChange,
        ) -> Result<StatusUpdateOutcome, DomainError> {
            Err(DomainError::database("read only"))
        }
        async fn save_subscription_state(&self, _tenant: &Tenant) -> Result<(), DomainError> {
            Err(DomainError::database("read only"))
        }
        async fn list_by_owner(&self, _owner_id: &UserId) -> Result<Vec<Tenant>, DomainError> {
            Ok(vec![self.tenant.clone()])
        }
        async fn count_by_owner(&self, _owner_id: &UserId) -> Result<u32, DomainError> {
            Ok(1)
        }
        async fn count_by_owner_provisioned_by(
            &self,
            _owner_id: &UserId,
            _provisioned_by: Provisioner,
        ) -> Result<u32, DomainError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn failed_write_back_still_returns_reconciled_tenant() {
        let tenant = trial_tenant("professional", Some(Timestamp::now().minus_days(3)));
        let repo = Arc::new(ReadOnlyRepository {
            tenant: tenant.clone(),
        });

        let loaded = reconciler(repo).load(&tenant.id).await.unwrap();

        assert_eq!(loaded.subscription_status, SubscriptionStatus::Expired);
        assert_eq!(loaded.tier, key("discovery"));
    }

    #[tokio::test]
    async fn load_owned_reconciles_each_tenant() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        repo.insert(trial_tenant("storefront", Some(Timestamp::now().minus_days(1)))).await;
        repo.insert(trial_tenant("storefront", Some(Timestamp::now().add_days(5)))).await;

        let owned = reconciler(repo)
            .load_owned(&UserId::new("owner-1").unwrap())
            .await
            .unwrap();

        assert_eq!(owned.len(), 2);
        assert_eq!(
            owned
                .iter()
                .filter(|t| t.subscription_status == SubscriptionStatus::Expired)
                .count(),
            1
        );
    }
}
