//! EntitlementResolver - what a tenant may do right now.
//!
//! Pure functions over an immutable [`EntitlementTable`]. Nothing here reads
//! the clock or the environment; trial state must already be reconciled.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use super::{
    CatalogError, EntitlementTable, FeatureKey, Limit, ResolvedFeature, TierDefinition,
    TierFeatureModel, TierKey,
};
use crate::domain::access::PlatformRole;
use crate::domain::foundation::TenantId;
use crate::domain::tenant::{SubscriptionStatus, Tenant};

/// Resolved entitlements of one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveEntitlements {
    pub tenant_id: TenantId,
    /// Tier the numbers were resolved from (after unknown-key fallback).
    pub tier: TierKey,
    pub subscription_status: SubscriptionStatus,
    pub location_limit: Limit,
    pub remaining_slots: Limit,
    pub features: Vec<ResolvedFeature>,
    pub upgrade_target: Option<TierKey>,
    pub sku_quota: Limit,
    pub remaining_sku_quota: Limit,
    pub featuring_slots: u32,
}

impl EffectiveEntitlements {
    pub fn feature_set(&self) -> BTreeSet<FeatureKey> {
        self.features.iter().map(|f| f.key.clone()).collect()
    }

    pub fn has_feature(&self, key: &FeatureKey) -> bool {
        self.features.iter().any(|f| &f.key == key)
    }
}

/// Resolves limits and features from the tier catalog.
#[derive(Debug, Clone)]
pub struct EntitlementResolver {
    table: Arc<EntitlementTable>,
}

impl EntitlementResolver {
    pub fn new(table: Arc<EntitlementTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &EntitlementTable {
        &self.table
    }

    fn tier(&self, key: &TierKey) -> &TierDefinition {
        self.table.resolve(key)
    }

    /// Trial caps locations at the trial limit whatever the tier grants.
    pub fn effective_location_limit(&self, tier: &TierKey, status: SubscriptionStatus) -> Limit {
        if status.is_trial() {
            self.table.trial().location_limit()
        } else {
            self.tier(tier).max_locations
        }
    }

    pub fn remaining_location_slots(
        &self,
        current: u32,
        tier: &TierKey,
        status: SubscriptionStatus,
    ) -> Limit {
        self.effective_location_limit(tier, status).remaining(current)
    }

    pub fn can_create_location(&self, current: u32, tier: &TierKey, status: SubscriptionStatus) -> bool {
        self.effective_location_limit(tier, status).allows_another(current)
    }

    /// Location limit an owner is held to, across all their tenants.
    ///
    /// The most permissive tenant governs. An owner with no tenants gets
    /// the trial limit, since the first location starts a trial.
    pub fn owner_location_limit(&self, tenants: &[Tenant]) -> Limit {
        tenants
            .iter()
            .map(|t| self.effective_location_limit(&t.tier, t.subscription_status))
            .max()
            .unwrap_or_else(|| self.table.trial().location_limit())
    }

    /// Locations a platform operator may create for one target owner.
    ///
    /// Support's cap counts only tenants provisioned by platform support and
    /// is independent of the owner's tier.
    pub fn platform_creation_limit(&self, role: PlatformRole) -> Limit {
        match role {
            PlatformRole::Admin => Limit::Unbounded,
            PlatformRole::Support => Limit::Limited(self.table.platform_support_creation_cap()),
            PlatformRole::Viewer => Limit::Limited(0),
        }
    }

    /// Flattened feature set.
    ///
    /// # Errors
    ///
    /// `CyclicInheritance` or `MissingBaseTier` when the catalog is broken.
    pub fn effective_feature_set(&self, tier: &TierKey) -> Result<BTreeSet<FeatureKey>, CatalogError> {
        TierFeatureModel::new(&self.table).effective_feature_set(tier)
    }

    pub fn effective_features(&self, tier: &TierKey) -> Result<Vec<ResolvedFeature>, CatalogError> {
        TierFeatureModel::new(&self.table).effective_features(tier)
    }

    /// Next tier to offer. On trial the offer is to convert the current
    /// tier to paid, so the target is the tier itself.
    pub fn upgrade_target(&self, tier: &TierKey, status: SubscriptionStatus) -> Option<TierKey> {
        let resolved = self.tier(tier);
        if status.is_trial() {
            Some(resolved.key.clone())
        } else {
            resolved.next_tier.clone()
        }
    }

    pub fn sku_quota(&self, tier: &TierKey) -> Limit {
        self.tier(tier).max_skus
    }

    /// SKUs left this period. A per-tenant quota overrides the tier hint.
    pub fn remaining_sku_quota(&self, tenant: &Tenant) -> Limit {
        let quota = match tenant.sku_quota {
            Some(n) => Limit::Limited(n),
            None => self.sku_quota(&tenant.tier),
        };
        quota.remaining(tenant.skus_used_this_period)
    }

    pub fn featuring_slots(&self, tier: &TierKey) -> u32 {
        self.tier(tier).featuring_slots
    }

    pub fn can_feature_product(&self, current_featured: u32, tier: &TierKey) -> bool {
        current_featured < self.featuring_slots(tier)
    }

    /// Everything at once for one tenant.
    ///
    /// `owned` is every tenant the owner holds, this one included. The
    /// location numbers are owner-wide, the same ones creation is checked
    /// against; everything else comes from this tenant's own tier.
    pub fn entitlements_for(
        &self,
        tenant: &Tenant,
        owned: &[Tenant],
    ) -> Result<EffectiveEntitlements, CatalogError> {
        let tier = self.tier(&tenant.tier);
        let status = tenant.subscription_status;
        let owned = if owned.is_empty() { std::slice::from_ref(tenant) } else { owned };
        let location_limit = self.owner_location_limit(owned);
        let owner_location_count = u32::try_from(owned.len()).unwrap_or(u32::MAX);

        Ok(EffectiveEntitlements {
            tenant_id: tenant.id,
            tier: tier.key.clone(),
            subscription_status: status,
            location_limit,
            remaining_slots: location_limit.remaining(owner_location_count),
            features: self.effective_features(&tier.key)?,
            upgrade_target: self.upgrade_target(&tier.key, status),
            sku_quota: match tenant.sku_quota {
                Some(n) => Limit::Limited(n),
                None => tier.max_skus,
            },
            remaining_sku_quota: self.remaining_sku_quota(tenant),
            featuring_slots: tier.featuring_slots,
        })
    }
}
