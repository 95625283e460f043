//! Tenant domain module.
//!
//! A tenant is one retail location. This module owns its aggregate, the
//! two status enumerations, the operational-status state machine and its
//! pluggable policy, trial expiry and the append-only history entry.

mod aggregate;
mod errors;
mod history;
mod lifecycle;
mod location_status;
mod subscription_status;
mod transition_policy;
mod trial;

pub use aggregate::{LocationStatusChange, Provisioner, Tenant};
pub use errors::TenantError;
pub use history::StatusHistoryEntry;
pub use lifecycle::{LifecycleStateMachine, StatusChangePreview, TransitionPlan};
pub use location_status::LocationStatus;
pub use subscription_status::SubscriptionStatus;
pub use transition_policy::{
    DefaultTransitionPolicy, DirectoryPresence, RejectionReason, StatusImpact, TransitionPolicy,
    TransitionRequest,
};
pub use trial::{TrialExpirationEvaluator, TrialReconciliation};
