//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `access` - Tenant and platform roles, memberships
//! - `entitlement` - Tier catalog, feature inheritance, entitlement resolution
//! - `tenant` - Tenant aggregate, lifecycle state machine, trial expiry

pub mod access;
pub mod entitlement;
pub mod foundation;
pub mod tenant;
