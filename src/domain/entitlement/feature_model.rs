//! TierFeatureModel - hierarchical feature composition.
//!
//! A tier's effective feature set is its own feature rows plus the effective
//! set of its `base_tier`, transitively. Group tiers (organization, chain)
//! point at their individual counterpart and add group-only rows.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::{CatalogError, EntitlementTable, FeatureKey, TierDefinition, TierKey};

/// A feature in a tier's flattened set, with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFeature {
    pub key: FeatureKey,
    pub display_name: String,
    /// Nearest tier in the chain that declares the feature.
    pub owning_tier: TierKey,
    /// True when the feature reached this tier through inheritance.
    pub inherited: bool,
}

/// Resolves inheritance chains over an [`EntitlementTable`].
pub struct TierFeatureModel<'a> {
    table: &'a EntitlementTable,
}

impl<'a> TierFeatureModel<'a> {
    pub fn new(table: &'a EntitlementTable) -> Self {
        Self { table }
    }

    /// The tier followed by its ancestors, nearest first.
    ///
    /// # Errors
    ///
    /// - `MissingBaseTier` when a `base_tier` is not in the catalog
    /// - `CyclicInheritance` when the chain revisits a tier
    pub fn inheritance_chain(&self, key: &TierKey) -> Result<Vec<&'a TierDefinition>, CatalogError> {
        let mut current: &'a TierDefinition = self.table.resolve(key);
        let mut chain = vec![current];
        let mut seen: HashSet<&'a TierKey> = HashSet::new();
        seen.insert(&current.key);

        while let Some(base_key) = current.base_tier.as_ref() {
            let base = self
                .table
                .get(base_key)
                .ok_or_else(|| CatalogError::MissingBaseTier {
                    tier: current.key.clone(),
                    base: base_key.clone(),
                })?;

            if !seen.insert(&base.key) {
                let mut cycle: Vec<TierKey> = chain.iter().map(|t| t.key.clone()).collect();
                cycle.push(base.key.clone());
                return Err(CatalogError::CyclicInheritance { chain: cycle });
            }
            chain.push(base);
            current = base;
        }

        Ok(chain)
    }

    /// Flattened features with provenance, ordered by key.
    pub fn effective_features(&self, key: &TierKey) -> Result<Vec<ResolvedFeature>, CatalogError> {
        let chain = self.inheritance_chain(key)?;
        let leaf = &chain[0].key;
        let mut resolved: BTreeMap<FeatureKey, ResolvedFeature> = BTreeMap::new();

        for tier in &chain {
            for feature in &tier.features {
                resolved
                    .entry(feature.key.clone())
                    .or_insert_with(|| ResolvedFeature {
                        key: feature.key.clone(),
                        display_name: feature.display_name.clone(),
                        owning_tier: tier.key.clone(),
                        inherited: &tier.key != leaf || feature.is_inherited,
                    });
            }
        }

        Ok(resolved.into_values().collect())
    }

    /// Flattened feature keys.
    pub fn effective_feature_set(&self, key: &TierKey) -> Result<BTreeSet<FeatureKey>, CatalogError> {
        let chain = self.inheritance_chain(key)?;
        Ok(chain
            .iter()
            .flat_map(|tier| tier.features.iter().map(|f| f.key.clone()))
            .collect())
    }

    /// Resolve every tier once so configuration defects fail at startup.
    pub fn validate_all(&self) -> Result<(), CatalogError> {
        for tier in self.table.tiers() {
            self.inheritance_chain(&tier.key)?;
        }
        Ok(())
    }
}
