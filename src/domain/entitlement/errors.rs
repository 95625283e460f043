//! Entitlement catalog errors.
//!
//! Every variant is a configuration defect. They are surfaced to the caller
//! and never patched over with a guessed default.

use thiserror::Error;

use super::TierKey;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Errors raised while building or resolving the tier catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("tier catalog is empty")]
    EmptyCatalog,

    #[error("tier '{0}' is declared more than once")]
    DuplicateTier(TierKey),

    #[error("tier key '{0}' is reserved")]
    ReservedTierKey(TierKey),

    #[error("baseline tier '{0}' is not in the catalog")]
    UnknownBaselineTier(TierKey),

    #[error("tier '{tier}' inherits from '{base}', which is not in the catalog")]
    MissingBaseTier { tier: TierKey, base: TierKey },

    #[error("tier inheritance cycle: {}", format_chain(.chain))]
    CyclicInheritance { chain: Vec<TierKey> },

    #[error("trial override is invalid: {0}")]
    InvalidTrialOverride(String),
}

fn format_chain(chain: &[TierKey]) -> String {
    chain
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        DomainError::new(ErrorCode::ConfigurationError, err.to_string())
    }
}
