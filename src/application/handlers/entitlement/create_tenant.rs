//! CreateTenantHandler - Command handler for opening a new location.
//!
//! Every new location starts a trial on the requested tier (the baseline
//! when none is given) and enters the lifecycle as `pending`.

use std::sync::Arc;

use super::{CheckLocationCreationHandler, CheckLocationCreationQuery};
use crate::domain::access::PlatformRole;
use crate::domain::entitlement::{EntitlementTable, TierKey};
use crate::domain::foundation::{OrganizationId, Timestamp, UserId};
use crate::domain::tenant::{Provisioner, Tenant, TenantError};
use crate::ports::TenantRepository;

const CREATE_LOCATION_ACTION: &str = "create a location";

#[derive(Debug, Clone)]
pub struct CreateTenantCommand {
    pub requested_by: UserId,
    pub platform_role: Option<PlatformRole>,
    pub owner_id: UserId,
    pub organization_id: Option<OrganizationId>,
    pub name: String,
    pub tier: Option<TierKey>,
}

pub type CreateTenantResult = Tenant;

pub struct CreateTenantHandler {
    repository: Arc<dyn TenantRepository>,
    table: Arc<EntitlementTable>,
    creation_check: Arc<CheckLocationCreationHandler>,
}

impl CreateTenantHandler {
    pub fn new(
        repository: Arc<dyn TenantRepository>,
        table: Arc<EntitlementTable>,
        creation_check: Arc<CheckLocationCreationHandler>,
    ) -> Self {
        Self {
            repository,
            table,
            creation_check,
        }
    }

    pub async fn handle(&self, cmd: CreateTenantCommand) -> Result<CreateTenantResult, TenantError> {
        // 1. Viewers are read-only
        if cmd.platform_role == Some(PlatformRole::Viewer) {
            return Err(TenantError::forbidden(cmd.requested_by, CREATE_LOCATION_ACTION));
        }

        // 2. Tier must be configured; no silent fallback on create
        let tier = match &cmd.tier {
            Some(key) => self.table.get(key).ok_or_else(|| {
                TenantError::validation("tier", format!("unknown tier '{}'", key))
            })?,
            None => self.table.baseline_tier(),
        };

        // 3. Creation limit (advisory, check-then-act)
        let check = self
            .creation_check
            .handle(CheckLocationCreationQuery {
                requested_by: cmd.requested_by.clone(),
                platform_role: cmd.platform_role,
                owner_id: cmd.owner_id.clone(),
            })
            .await?;
        if !check.allowed {
            return Err(TenantError::limit_reached(cmd.owner_id, check.limit, check.current));
        }

        // 4. Build and persist
        let provisioned_by = match cmd.platform_role {
            Some(role) => Provisioner::Platform(role),
            None => Provisioner::Owner,
        };
        let tenant = Tenant::start_trial(
            cmd.owner_id,
            cmd.organization_id,
            cmd.name,
            tier,
            self.table.trial(),
            provisioned_by,
            Timestamp::now(),
        )?;
        self.repository.save(&tenant).await?;

        tracing::info!(
            tenant_id = %tenant.id,
            owner_id = %tenant.owner_id,
            tier = %tenant.tier,
            provisioned_by = tenant.provisioned_by.as_str(),
            "Tenant created"
        );

        Ok(tenant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryTenantRepository;
    use crate::application::handlers::tenant::TrialReconciler;
    use crate::domain::entitlement::catalog::test_support::{key, standard_table};
    use crate::domain::entitlement::{EntitlementResolver, Limit};
    use crate::domain::tenant::{LocationStatus, SubscriptionStatus, TrialExpirationEvaluator};

    fn handler(repo: Arc<InMemoryTenantRepository>) -> CreateTenantHandler {
        let table = Arc::new(standard_table());
        let reconciler = Arc::new(TrialReconciler::new(
            repo.clone(),
            TrialExpirationEvaluator::new(table.clone()),
        ));
        let check = Arc::new(CheckLocationCreationHandler::new(
            repo.clone(),
            reconciler,
            EntitlementResolver::new(table.clone()),
        ));
        CreateTenantHandler::new(repo, table, check)
    }

    fn command(platform_role: Option<PlatformRole>, tier: Option<&str>) -> CreateTenantCommand {
        let requested_by = if platform_role.is_some() { "staff-1" } else { "owner-1" };
        CreateTenantCommand {
            requested_by: UserId::new(requested_by).unwrap(),
            platform_role,
            owner_id: UserId::new("owner-1").unwrap(),
            organization_id: None,
            name: "  Corner Books ".to_string(),
            tier: tier.map(key),
        }
    }

    #[tokio::test]
    async fn owner_creates_pending_trial_on_baseline() {
        let repo = Arc::new(InMemoryTenantRepository::new());

        let tenant = handler(repo.clone()).handle(command(None, None)).await.unwrap();

        assert_eq!(tenant.name, "Corner Books");
        assert_eq!(tenant.tier, key("discovery"));
        assert_eq!(tenant.subscription_status, SubscriptionStatus::Trial);
        assert!(tenant.trial_ends_at.is_some());
        assert_eq!(tenant.location_status, LocationStatus::Pending);
        assert_eq!(tenant.provisioned_by, Provisioner::Owner);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn second_trial_location_hits_limit() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        let h = handler(repo.clone());
        h.handle(command(None, Some("storefront"))).await.unwrap();

        let err = h.handle(command(None, Some("storefront"))).await.unwrap_err();

        assert_eq!(
            err,
            TenantError::LimitReached {
                owner: UserId::new("owner-1").unwrap(),
                limit: Limit::Limited(1),
                current: 1,
            }
        );
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn support_provisioning_is_recorded_and_capped() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        let h = handler(repo.clone());

        for _ in 0..3 {
            let t = h.handle(command(Some(PlatformRole::Support), None)).await.unwrap();
            assert_eq!(t.provisioned_by, Provisioner::Platform(PlatformRole::Support));
        }
        let err = h.handle(command(Some(PlatformRole::Support), None)).await.unwrap_err();

        assert!(matches!(err, TenantError::LimitReached { current: 3, .. }));
    }

    #[tokio::test]
    async fn viewer_is_forbidden() {
        let repo = Arc::new(InMemoryTenantRepository::new());

        let err = handler(repo.clone())
            .handle(command(Some(PlatformRole::Viewer), None))
            .await
            .unwrap_err();

        assert!(matches!(err, TenantError::Forbidden { .. }));
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn unknown_tier_is_rejected() {
        let repo = Arc::new(InMemoryTenantRepository::new());

        let err = handler(repo).handle(command(None, Some("platinum"))).await.unwrap_err();

        assert!(matches!(err, TenantError::ValidationFailed { ref field, .. } if field == "tier"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let repo = Arc::new(InMemoryTenantRepository::new());
        let mut cmd = command(None, None);
        cmd.name = "   ".to_string();

        let err = handler(repo).handle(cmd).await.unwrap_err();

        assert!(matches!(err, TenantError::ValidationFailed { .. }));
    }
}
