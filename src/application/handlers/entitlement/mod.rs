//! Entitlement handlers.
//!
//! ## Queries
//! - Effective entitlements of a tenant
//! - Whether another location may be created
//!
//! ## Commands
//! - Create a tenant (location), gated on the creation check

mod check_location_creation;
mod create_tenant;
mod get_effective_entitlements;

pub use check_location_creation::{
    CheckLocationCreationHandler, CheckLocationCreationQuery, CreationCheck, CreationGovernedBy,
};
pub use create_tenant::{CreateTenantCommand, CreateTenantHandler, CreateTenantResult};
pub use get_effective_entitlements::{
    GetEffectiveEntitlementsHandler, GetEffectiveEntitlementsQuery, GetEffectiveEntitlementsResult,
};
