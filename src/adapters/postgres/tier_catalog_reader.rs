//! PostgreSQL implementation of TierCatalogReader.

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::domain::entitlement::{FeatureDefinition, FeatureKey, Limit, TierClass, TierDefinition, TierKey};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::TierCatalogReader;

pub struct PostgresTierCatalogReader {
    pool: PgPool,
}

impl PostgresTierCatalogReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TierRow {
    key: String,
    display_name: String,
    price_monthly_cents: i64,
    tier_class: String,
    max_locations: Option<i32>,
    max_skus: Option<i32>,
    featuring_slots: i32,
    base_tier: Option<String>,
    next_tier: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct FeatureRow {
    tier_key: String,
    feature_key: String,
    display_name: String,
    is_inherited: bool,
}

fn invalid(what: &str, detail: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::ConfigurationError,
        format!("Invalid {} in tier catalog: {}", what, detail),
    )
}

fn tier_key(raw: String) -> Result<TierKey, DomainError> {
    TierKey::new(raw).map_err(|e| invalid("tier key", e))
}

/// NULL is unbounded; negative values are corrupt.
fn limit(column: &str, value: Option<i32>) -> Result<Limit, DomainError> {
    match value {
        None => Ok(Limit::Unbounded),
        Some(n) => u32::try_from(n)
            .map(Limit::Limited)
            .map_err(|_| invalid(column, format!("negative value {}", n))),
    }
}

impl TryFrom<TierRow> for TierDefinition {
    type Error = DomainError;

    fn try_from(row: TierRow) -> Result<Self, Self::Error> {
        Ok(TierDefinition {
            key: tier_key(row.key)?,
            display_name: row.display_name,
            price_monthly_cents: row.price_monthly_cents,
            tier_class: TierClass::parse(&row.tier_class)
                .ok_or_else(|| invalid("tier_class", &row.tier_class))?,
            max_locations: limit("max_locations", row.max_locations)?,
            max_skus: limit("max_skus", row.max_skus)?,
            featuring_slots: u32::try_from(row.featuring_slots)
                .map_err(|_| invalid("featuring_slots", row.featuring_slots))?,
            base_tier: row.base_tier.map(tier_key).transpose()?,
            next_tier: row.next_tier.map(tier_key).transpose()?,
            features: Vec::new(),
        })
    }
}

impl TryFrom<FeatureRow> for FeatureDefinition {
    type Error = DomainError;

    fn try_from(row: FeatureRow) -> Result<Self, Self::Error> {
        Ok(FeatureDefinition {
            key: FeatureKey::new(row.feature_key).map_err(|e| invalid("feature key", e))?,
            display_name: row.display_name,
            owning_tier: tier_key(row.tier_key)?,
            is_inherited: row.is_inherited,
        })
    }
}

/// Attach feature rows to their tiers. Rows naming an unknown tier are an error.
fn assemble(tiers: Vec<TierRow>, features: Vec<FeatureRow>) -> Result<Vec<TierDefinition>, DomainError> {
    let mut defs = tiers
        .into_iter()
        .map(TierDefinition::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let index: HashMap<TierKey, usize> = defs
        .iter()
        .enumerate()
        .map(|(pos, t)| (t.key.clone(), pos))
        .collect();

    for row in features {
        let feature = FeatureDefinition::try_from(row)?;
        let pos = *index
            .get(&feature.owning_tier)
            .ok_or_else(|| invalid("feature row", format!("unknown tier '{}'", feature.owning_tier)))?;
        defs[pos].features.push(feature);
    }

    Ok(defs)
}

#[async_trait]
impl TierCatalogReader for PostgresTierCatalogReader {
    async fn load_tiers(&self) -> Result<Vec<TierDefinition>, DomainError> {
        let tiers: Vec<TierRow> = sqlx::query_as(
            r#"
            SELECT key, display_name, price_monthly_cents, tier_class, max_locations, max_skus,
                   featuring_slots, base_tier, next_tier
            FROM subscription_tiers
            ORDER BY sort_order ASC, key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load tiers: {}", e)))?;

        let features: Vec<FeatureRow> = sqlx::query_as(
            r#"
            SELECT tier_key, feature_key, display_name, is_inherited
            FROM tier_features
            ORDER BY tier_key ASC, feature_key ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load tier features: {}", e)))?;

        assemble(tiers, features)
    }
}
