//! Tier catalog reader port.
//!
//! Loads tier rows and their feature rows from the store so the catalog
//! can be built from seeded data instead of the bundled YAML.

use async_trait::async_trait;

use crate::domain::entitlement::TierDefinition;
use crate::domain::foundation::DomainError;

/// Reader port for the tier catalog.
#[async_trait]
pub trait TierCatalogReader: Send + Sync {
    /// All tiers with their tier-specific feature rows attached.
    ///
    /// Inherited features are not expanded here; the feature model
    /// resolves them.
    async fn load_tiers(&self) -> Result<Vec<TierDefinition>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_catalog_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn TierCatalogReader) {}
    }
}
