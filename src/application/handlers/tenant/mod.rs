//! Tenant read path.
//!
//! ## Queries
//! - Get a tenant, with trial expiry reconciled and written back

mod get_tenant;
mod trial_reconciler;

pub use get_tenant::{GetTenantHandler, GetTenantQuery, GetTenantResult};
pub use trial_reconciler::TrialReconciler;
