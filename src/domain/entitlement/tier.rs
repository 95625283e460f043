//! Tier and feature definitions.
//!
//! A tier is a named subscription plan granting a location limit, a SKU
//! quota hint, featuring slots and a feature set. Tier keys are configurable,
//! so they are validated strings rather than a Rust enum.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Limit;
use crate::domain::foundation::ValidationError;

fn validate_key(field: &str, raw: &str) -> Result<(), ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    let valid = raw
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        return Err(ValidationError::invalid_format(
            field,
            format!("'{}' must be lowercase snake_case", raw),
        ));
    }
    Ok(())
}

/// Unique key of a subscription tier (e.g. `storefront`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TierKey(String);

impl TierKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        validate_key("tier_key", &key)?;
        Ok(Self(key))
    }

    /// Placeholder for a stored key that fails validation.
    ///
    /// Catalogs may not declare it, so it always resolves to the most
    /// restrictive tier.
    pub fn unrecognized() -> Self {
        Self(UNRECOGNIZED_TIER_KEY.to_string())
    }

    pub fn is_unrecognized(&self) -> bool {
        self.0 == UNRECOGNIZED_TIER_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const UNRECOGNIZED_TIER_KEY: &str = "__unrecognized";

impl TryFrom<String> for TierKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TierKey::new(value)
    }
}

impl From<TierKey> for String {
    fn from(key: TierKey) -> Self {
        key.0
    }
}

impl fmt::Display for TierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique key of an unlockable feature (e.g. `bulk_import`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FeatureKey(String);

impl FeatureKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        validate_key("feature_key", &key)?;
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FeatureKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FeatureKey::new(value)
    }
}

impl From<FeatureKey> for String {
    fn from(key: FeatureKey) -> Self {
        key.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a tier is sold to single locations or to groups of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierClass {
    Individual,
    Organization,
}

impl TierClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TierClass::Individual => "individual",
            TierClass::Organization => "organization",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(TierClass::Individual),
            "organization" => Some(TierClass::Organization),
            _ => None,
        }
    }
}

/// A tier-specific feature row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    pub key: FeatureKey,
    pub display_name: String,
    /// Tier this row is declared on.
    pub owning_tier: TierKey,
    /// Provenance flag carried by seeded rows. Does not affect enablement.
    #[serde(default)]
    pub is_inherited: bool,
}

/// Everything a tier grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDefinition {
    pub key: TierKey,
    pub display_name: String,
    /// Monthly list price in cents.
    pub price_monthly_cents: i64,
    pub tier_class: TierClass,
    /// Locations the owner may hold on this tier.
    pub max_locations: Limit,
    /// SKU quota hint copied onto new tenants.
    pub max_skus: Limit,
    /// Products that may be featured at once.
    pub featuring_slots: u32,
    /// Tier whose effective feature set this tier inherits.
    pub base_tier: Option<TierKey>,
    /// Upgrade pointer offered to tenants on this tier.
    pub next_tier: Option<TierKey>,
    /// Tier-specific feature rows (inherited ones are resolved, not listed).
    pub features: Vec<FeatureDefinition>,
}

impl TierDefinition {
    /// Returns true if this tier costs money.
    pub fn is_paid(&self) -> bool {
        self.price_monthly_cents > 0
    }

    /// Ordering key used to find the most restrictive tier.
    pub(crate) fn restrictiveness(&self) -> (Limit, Limit, u32, i64) {
        (
            self.max_locations,
            self.max_skus,
            self.featuring_slots,
            self.price_monthly_cents,
        )
    }
}

impl fmt::Display for TierDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}
