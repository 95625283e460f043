//! CheckLocationCreationHandler - Query handler for "may another location be created".
//!
//! Two independent rules:
//! - an owner creating for themselves is held to the most permissive
//!   limit across their own tenants
//! - a platform operator creating on behalf of an owner is held to the
//!   cap of their platform role, whatever the owner's tier
//!
//! The answer is advisory. Nothing is reserved.

use serde::Serialize;
use std::sync::Arc;

use crate::application::handlers::tenant::TrialReconciler;
use crate::domain::access::PlatformRole;
use crate::domain::entitlement::{EntitlementResolver, Limit};
use crate::domain::foundation::UserId;
use crate::domain::tenant::{Provisioner, TenantError};
use crate::ports::TenantRepository;

const CREATE_LOCATION_ACTION: &str = "create a location for another owner";

#[derive(Debug, Clone)]
pub struct CheckLocationCreationQuery {
    /// Who is asking.
    pub requested_by: UserId,
    /// Platform role of the requester, if any.
    pub platform_role: Option<PlatformRole>,
    /// Owner the new location would belong to.
    pub owner_id: UserId,
}

/// Which rule produced the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "role")]
pub enum CreationGovernedBy {
    OwnerTier,
    PlatformRole(PlatformRole),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreationCheck {
    pub allowed: bool,
    pub limit: Limit,
    /// Locations counted against `limit`.
    pub current: u32,
    pub remaining: Limit,
    pub governed_by: CreationGovernedBy,
}

impl CreationCheck {
    fn new(limit: Limit, current: u32, governed_by: CreationGovernedBy) -> Self {
        Self {
            allowed: limit.allows_another(current),
            limit,
            current,
            remaining: limit.remaining(current),
            governed_by,
        }
    }
}

pub struct CheckLocationCreationHandler {
    repository: Arc<dyn TenantRepository>,
    reconciler: Arc<TrialReconciler>,
    resolver: EntitlementResolver,
}

impl CheckLocationCreationHandler {
    pub fn new(
        repository: Arc<dyn TenantRepository>,
        reconciler: Arc<TrialReconciler>,
        resolver: EntitlementResolver,
    ) -> Self {
        Self {
            repository,
            reconciler,
            resolver,
        }
    }

    pub async fn handle(&self, query: CheckLocationCreationQuery) -> Result<CreationCheck, TenantError> {
        if let Some(role) = query.platform_role {
            return self.platform_check(role, &query.owner_id).await;
        }

        if query.requested_by != query.owner_id {
            return Err(TenantError::forbidden(query.requested_by, CREATE_LOCATION_ACTION));
        }

        // Reconcile first so an expired trial no longer counts as a trial.
        let tenants = self.reconciler.load_owned(&query.owner_id).await?;
        let limit = self.resolver.owner_location_limit(&tenants);
        let current = u32::try_from(tenants.len()).unwrap_or(u32::MAX);

        Ok(CreationCheck::new(limit, current, CreationGovernedBy::OwnerTier))
    }

    async fn platform_check(&self, role: PlatformRole, owner_id: &UserId) -> Result<CreationCheck, TenantError> {
        let limit = self.resolver.platform_creation_limit(role);
        let current = match role {
            PlatformRole::Support => {
                self.repository
                    .count_by_owner_provisioned_by(owner_id, Provisioner::Platform(PlatformRole::Support))
                    .await?
            }
            PlatformRole::Admin | PlatformRole::Viewer => self.repository.count_by_owner(owner_id).await?,
        };

        Ok(CreationCheck::new(limit, current, CreationGovernedBy::PlatformRole(role)))
    }
}
