//! ResolveActorHandler - turns a user into the actor of a tenant request.

use std::sync::Arc;

use crate::domain::access::{effective_actor_role, Actor, Membership, TenantRole};
use crate::domain::foundation::{TenantId, UserId};
use crate::domain::tenant::TenantError;
use crate::ports::{MembershipReader, TenantRepository};

const ACCESS_TENANT_ACTION: &str = "access this tenant";

#[derive(Debug, Clone)]
pub struct ResolveActorQuery {
    pub user_id: UserId,
    pub tenant_id: TenantId,
}

pub type ResolveActorResult = Actor;

/// Combines the user's platform role, tenant ownership and membership.
///
/// The tenant owner always acts at least as `Owner` even without a
/// membership row. A user with no grant at all is forbidden.
pub struct ResolveActorHandler {
    tenants: Arc<dyn TenantRepository>,
    memberships: Arc<dyn MembershipReader>,
}

impl ResolveActorHandler {
    pub fn new(tenants: Arc<dyn TenantRepository>, memberships: Arc<dyn MembershipReader>) -> Self {
        Self {
            tenants,
            memberships,
        }
    }

    pub async fn handle(&self, query: ResolveActorQuery) -> Result<ResolveActorResult, TenantError> {
        let tenant = self
            .tenants
            .find_by_id(&query.tenant_id)
            .await?
            .ok_or(TenantError::NotFound(query.tenant_id))?;

        let platform_role = self.memberships.platform_role(&query.user_id).await?;

        let membership = if tenant.owner_id == query.user_id {
            Some(Membership::new(query.user_id.clone(), tenant.id, TenantRole::Owner))
        } else {
            self.memberships
                .find_membership(&query.user_id, &query.tenant_id)
                .await?
        };

        match effective_actor_role(platform_role, membership.as_ref()) {
            Some(role) => Ok(Actor::new(query.user_id, role)),
            None => Err(TenantError::forbidden(query.user_id, ACCESS_TENANT_ACTION)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryMembershipReader, InMemoryTenantRepository};
    use crate::domain::access::{ActorRole, PlatformRole};
    use crate::domain::entitlement::catalog::test_support::standard_table;
    use crate::domain::foundation::Timestamp;
    use crate::domain::tenant::{Provisioner, Tenant};

    async fn setup() -> (ResolveActorHandler, Arc<InMemoryMembershipReader>, Tenant) {
        let table = standard_table();
        let tenant = Tenant::start_trial(
            UserId::new("owner-1").unwrap(),
            None,
            "Corner Books",
            table.baseline_tier(),
            table.trial(),
            Provisioner::Owner,
            Timestamp::now(),
        )
        .unwrap();
        let tenants = Arc::new(InMemoryTenantRepository::new());
        tenants.insert(tenant.clone()).await;
        let memberships = Arc::new(InMemoryMembershipReader::new());
        (
            ResolveActorHandler::new(tenants, memberships.clone()),
            memberships,
            tenant,
        )
    }

    fn query(user: &str, tenant_id: TenantId) -> ResolveActorQuery {
        ResolveActorQuery {
            user_id: UserId::new(user).unwrap(),
            tenant_id,
        }
    }

    #[tokio::test]
    async fn owner_acts_as_owner_without_membership_row() {
        let (handler, _memberships, tenant) = setup().await;

        let actor = handler.handle(query("owner-1", tenant.id)).await.unwrap();

        assert_eq!(actor.role, ActorRole::Tenant(TenantRole::Owner));
    }

    #[tokio::test]
    async fn member_acts_through_membership() {
        let (handler, memberships, tenant) = setup().await;
        memberships
            .grant(Membership::new(UserId::new("clerk").unwrap(), tenant.id, TenantRole::Member))
            .await;

        let actor = handler.handle(query("clerk", tenant.id)).await.unwrap();

        assert_eq!(actor.role, ActorRole::Tenant(TenantRole::Member));
        assert!(!actor.role.can_change_status());
    }

    #[tokio::test]
    async fn platform_support_outranks_membership() {
        let (handler, memberships, tenant) = setup().await;
        let user = UserId::new("staff-1").unwrap();
        memberships.grant_platform_role(user.clone(), PlatformRole::Support).await;
        memberships
            .grant(Membership::new(user, tenant.id, TenantRole::Viewer))
            .await;

        let actor = handler.handle(query("staff-1", tenant.id)).await.unwrap();

        assert_eq!(actor.role, ActorRole::Platform(PlatformRole::Support));
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let (handler, _memberships, tenant) = setup().await;

        let err = handler.handle(query("stranger", tenant.id)).await.unwrap_err();

        assert!(matches!(err, TenantError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn unknown_tenant_is_not_found() {
        let (handler, _memberships, _tenant) = setup().await;
        let id = TenantId::new();

        let err = handler.handle(query("owner-1", id)).await.unwrap_err();

        assert_eq!(err, TenantError::NotFound(id));
    }
}
