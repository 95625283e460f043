//! Entitlement domain module.
//!
//! Tier catalog, hierarchical feature composition and the pure resolver
//! that turns {tier, subscription status, role} into limits and features.

pub(crate) mod catalog;
mod errors;
mod feature_model;
mod limit;
mod resolver;
mod tier;

pub use catalog::{EntitlementTable, TrialOverride};
pub use errors::CatalogError;
pub use feature_model::{ResolvedFeature, TierFeatureModel};
pub use limit::Limit;
pub use resolver::{EffectiveEntitlements, EntitlementResolver};
pub use tier::{FeatureDefinition, FeatureKey, TierClass, TierDefinition, TierKey};
