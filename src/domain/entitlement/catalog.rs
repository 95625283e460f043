//! EntitlementTable - the tier catalog plus the trial override record.
//!
//! Built once at process start from configuration (or from the tier rows in
//! the store) and shared immutably afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{CatalogError, Limit, TierDefinition, TierKey};

/// Limits that replace the tier's own numbers while a tenant is on trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOverride {
    /// Locations an owner may hold while on trial.
    pub location_limit: u32,
    /// Length of the trial window.
    pub duration_days: u32,
}

impl TrialOverride {
    pub fn location_limit(&self) -> Limit {
        Limit::Limited(self.location_limit)
    }
}

impl Default for TrialOverride {
    fn default() -> Self {
        Self {
            location_limit: 1,
            duration_days: 14,
        }
    }
}

/// Immutable tier catalog.
///
/// # Invariants
///
/// - tier keys are unique
/// - the baseline tier exists
/// - lookups of unknown keys resolve to the most restrictive tier
#[derive(Debug, Clone)]
pub struct EntitlementTable {
    tiers: Vec<TierDefinition>,
    index: HashMap<TierKey, usize>,
    baseline: usize,
    most_restrictive: usize,
    trial: TrialOverride,
    platform_support_creation_cap: u32,
}

impl EntitlementTable {
    /// Build the table, rejecting structurally broken catalogs.
    ///
    /// Inheritance edges are not checked here; a dangling or cyclic
    /// `base_tier` is reported when the feature set is resolved.
    pub fn new(
        tiers: Vec<TierDefinition>,
        baseline: TierKey,
        trial: TrialOverride,
        platform_support_creation_cap: u32,
    ) -> Result<Self, CatalogError> {
        if tiers.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        if trial.duration_days == 0 {
            return Err(CatalogError::InvalidTrialOverride(
                "duration_days must be positive".to_string(),
            ));
        }
        if trial.location_limit == 0 {
            return Err(CatalogError::InvalidTrialOverride(
                "location_limit must allow at least one location".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(tiers.len());
        for (pos, tier) in tiers.iter().enumerate() {
            if tier.key.is_unrecognized() {
                return Err(CatalogError::ReservedTierKey(tier.key.clone()));
            }
            if index.insert(tier.key.clone(), pos).is_some() {
                return Err(CatalogError::DuplicateTier(tier.key.clone()));
            }
        }

        let baseline_pos = *index
            .get(&baseline)
            .ok_or_else(|| CatalogError::UnknownBaselineTier(baseline.clone()))?;

        let most_restrictive = tiers
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| t.restrictiveness())
            .map(|(pos, _)| pos)
            .unwrap_or(baseline_pos);

        Ok(Self {
            tiers,
            index,
            baseline: baseline_pos,
            most_restrictive,
            trial,
            platform_support_creation_cap,
        })
    }

    /// Exact lookup.
    pub fn get(&self, key: &TierKey) -> Option<&TierDefinition> {
        self.index.get(key).map(|pos| &self.tiers[*pos])
    }

    /// Lookup that never grants more than the catalog's floor.
    ///
    /// Unknown keys resolve to the most restrictive configured tier.
    pub fn resolve(&self, key: &TierKey) -> &TierDefinition {
        match self.get(key) {
            Some(tier) => tier,
            None => {
                tracing::warn!(
                    tier = %key,
                    fallback = %self.most_restrictive_tier().key,
                    "Unknown tier key, resolving to most restrictive tier"
                );
                self.most_restrictive_tier()
            }
        }
    }

    pub fn contains(&self, key: &TierKey) -> bool {
        self.index.contains_key(key)
    }

    /// Free/metered tier that expired trials fall back to.
    pub fn baseline_tier(&self) -> &TierDefinition {
        &self.tiers[self.baseline]
    }

    pub fn most_restrictive_tier(&self) -> &TierDefinition {
        &self.tiers[self.most_restrictive]
    }

    pub fn trial(&self) -> &TrialOverride {
        &self.trial
    }

    pub fn platform_support_creation_cap(&self) -> u32 {
        self.platform_support_creation_cap
    }

    /// Tiers in declaration order.
    pub fn tiers(&self) -> impl Iterator<Item = &TierDefinition> {
        self.tiers.iter()
    }
}
