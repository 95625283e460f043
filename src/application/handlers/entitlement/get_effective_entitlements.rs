//! GetEffectiveEntitlementsHandler - Query handler for a tenant's limits and features.

use std::sync::Arc;

use crate::application::handlers::tenant::TrialReconciler;
use crate::domain::entitlement::{EffectiveEntitlements, EntitlementResolver};
use crate::domain::foundation::TenantId;
use crate::domain::tenant::TenantError;

#[derive(Debug, Clone)]
pub struct GetEffectiveEntitlementsQuery {
    pub tenant_id: TenantId,
}

pub type GetEffectiveEntitlementsResult = EffectiveEntitlements;

/// Resolves entitlements for one tenant after trial reconciliation.
///
/// The location limit and remaining slots are the owner-wide numbers that
/// `CheckLocationCreationHandler` enforces.
pub struct GetEffectiveEntitlementsHandler {
    reconciler: Arc<TrialReconciler>,
    resolver: EntitlementResolver,
}

impl GetEffectiveEntitlementsHandler {
    pub fn new(reconciler: Arc<TrialReconciler>, resolver: EntitlementResolver) -> Self {
        Self { reconciler, resolver }
    }

    pub async fn handle(
        &self,
        query: GetEffectiveEntitlementsQuery,
    ) -> Result<GetEffectiveEntitlementsResult, TenantError> {
        let tenant = self.reconciler.load(&query.tenant_id).await?;
        let owned = self.reconciler.load_owned(&tenant.owner_id).await?;

        let entitlements = self.resolver.entitlements_for(&tenant, &owned).map_err(|err| {
            tracing::error!(
                tenant_id = %tenant.id,
                tier = %tenant.tier,
                error = %err,
                "Tier catalog could not resolve features"
            );
            TenantError::Configuration(err)
        })?;

        Ok(entitlements)
    }
}
