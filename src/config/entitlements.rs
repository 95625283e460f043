//! Entitlement configuration
//!
//! The tier catalog is YAML. A copy ships inside the binary; a deployment
//! may point `catalog_path` at its own file, or build the tiers from the
//! database and keep only the trial and cap settings from here.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use crate::domain::entitlement::{
    EntitlementTable, FeatureDefinition, FeatureKey, Limit, TierClass, TierDefinition, TierKey,
    TrialOverride,
};

const DEFAULT_CATALOG: &str = include_str!("default_tiers.yaml");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntitlementConfig {
    /// YAML catalog replacing the bundled one.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

impl EntitlementConfig {
    /// Read and parse the configured catalog (or the bundled one).
    pub fn load_catalog(&self) -> Result<CatalogFile, ConfigError> {
        match &self.catalog_path {
            Some(path) => CatalogFile::from_path(path),
            None => CatalogFile::bundled(),
        }
    }

    /// Table from the YAML catalog.
    pub fn build_table(&self) -> Result<EntitlementTable, ConfigError> {
        let catalog = self.load_catalog()?;
        let tiers = catalog.tier_definitions()?;
        catalog.into_table(tiers)
    }

    /// Table from externally loaded tiers, using the YAML catalog only for
    /// baseline, trial and cap settings.
    pub fn build_table_with(&self, tiers: Vec<TierDefinition>) -> Result<EntitlementTable, ConfigError> {
        self.load_catalog()?.into_table(tiers)
    }
}

/// On-disk catalog shape.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogFile {
    pub baseline_tier: String,
    #[serde(default)]
    pub trial: TrialOverride,
    #[serde(default = "default_support_cap")]
    pub platform_support_creation_cap: u32,
    pub tiers: Vec<TierEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TierEntry {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub price_monthly_cents: i64,
    pub tier_class: TierClass,
    #[serde(default)]
    pub max_locations: Option<u32>,
    #[serde(default)]
    pub max_skus: Option<u32>,
    #[serde(default)]
    pub featuring_slots: u32,
    #[serde(default)]
    pub base_tier: Option<String>,
    #[serde(default)]
    pub next_tier: Option<String>,
    #[serde(default)]
    pub features: Vec<FeatureEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureEntry {
    pub key: String,
    pub display_name: String,
}

fn default_support_cap() -> u32 {
    3
}

fn tier_key(raw: &str) -> Result<TierKey, ConfigError> {
    TierKey::new(raw).map_err(|e| ConfigError::CatalogEntry(e.to_string()))
}

impl CatalogFile {
    pub fn bundled() -> Result<Self, ConfigError> {
        Self::parse(DEFAULT_CATALOG)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn tier_definitions(&self) -> Result<Vec<TierDefinition>, ConfigError> {
        self.tiers.iter().map(TierEntry::to_definition).collect()
    }

    fn into_table(self, tiers: Vec<TierDefinition>) -> Result<EntitlementTable, ConfigError> {
        let baseline = tier_key(&self.baseline_tier)?;
        Ok(EntitlementTable::new(
            tiers,
            baseline,
            self.trial,
            self.platform_support_creation_cap,
        )?)
    }
}

impl TierEntry {
    fn to_definition(&self) -> Result<TierDefinition, ConfigError> {
        let key = tier_key(&self.key)?;
        let features = self
            .features
            .iter()
            .map(|f| {
                Ok(FeatureDefinition {
                    key: FeatureKey::new(f.key.as_str())
                        .map_err(|e| ConfigError::CatalogEntry(e.to_string()))?,
                    display_name: f.display_name.clone(),
                    owning_tier: key.clone(),
                    is_inherited: false,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(TierDefinition {
            key: key.clone(),
            display_name: self.display_name.clone(),
            price_monthly_cents: self.price_monthly_cents,
            tier_class: self.tier_class,
            max_locations: Limit::from(self.max_locations),
            max_skus: Limit::from(self.max_skus),
            featuring_slots: self.featuring_slots,
            base_tier: self.base_tier.as_deref().map(tier_key).transpose()?,
            next_tier: self.next_tier.as_deref().map(tier_key).transpose()?,
            features,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::{CatalogError, TierFeatureModel};
    use std::io::Write;

    #[test]
    fn bundled_catalog_builds_a_consistent_table() {
        let table = EntitlementConfig::default().build_table().unwrap();

        assert_eq!(table.baseline_tier().key.as_str(), "discovery");
        assert_eq!(table.trial().duration_days, 14);
        assert_eq!(table.platform_support_creation_cap(), 3);
        assert_eq!(table.tiers().count(), 6);

        let model = TierFeatureModel::new(&table);
        for tier in table.tiers() {
            assert!(model.effective_feature_set(&tier.key).is_ok(), "{} does not resolve", tier.key);
        }
    }

    #[test]
    fn bundled_unlimited_tiers_are_unbounded() {
        let table = EntitlementConfig::default().build_table().unwrap();
        let enterprise = table.get(&TierKey::new("enterprise").unwrap()).unwrap();
        assert_eq!(enterprise.max_locations, Limit::Unbounded);
        assert_eq!(enterprise.max_skus, Limit::Unbounded);
    }

    #[test]
    fn catalog_path_overrides_bundled_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
baseline_tier: free
trial: {{ location_limit: 2, duration_days: 30 }}
tiers:
  - key: free
    display_name: Free
    tier_class: individual
    max_locations: 1
    max_skus: 10
"#
        )
        .unwrap();

        let config = EntitlementConfig {
            catalog_path: Some(file.path().to_path_buf()),
        };
        let table = config.build_table().unwrap();

        assert_eq!(table.baseline_tier().key.as_str(), "free");
        assert_eq!(table.trial().location_limit, 2);
        assert_eq!(table.platform_support_creation_cap(), 3);
    }

    #[test]
    fn missing_catalog_file_is_read_error() {
        let config = EntitlementConfig {
            catalog_path: Some(PathBuf::from("/nonexistent/storeplex/tiers.yaml")),
        };
        assert!(matches!(config.build_table(), Err(ConfigError::CatalogRead { .. })));
    }

    #[test]
    fn unknown_baseline_is_catalog_error() {
        let catalog = CatalogFile::parse(
            r#"
baseline_tier: gold
tiers:
  - { key: free, display_name: Free, tier_class: individual }
"#,
        )
        .unwrap();
        let tiers = catalog.tier_definitions().unwrap();
        assert!(matches!(
            catalog.into_table(tiers),
            Err(ConfigError::Catalog(CatalogError::UnknownBaselineTier(_)))
        ));
    }

    #[test]
    fn malformed_tier_key_is_entry_error() {
        let catalog = CatalogFile::parse(
            r#"
baseline_tier: free
tiers:
  - { key: "Free Tier", display_name: Free, tier_class: individual }
"#,
        )
        .unwrap();
        assert!(matches!(catalog.tier_definitions(), Err(ConfigError::CatalogEntry(_))));
    }
}
