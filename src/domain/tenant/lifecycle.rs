//! Lifecycle state machine for a location's operational status.
//!
//! Decides whether a status change may happen and what it writes. The
//! caller performs the atomic write and schedules side effects; nothing here
//! touches storage.
//!
//! Order of checks for a mutating change:
//!
//! 1. actor capability (`Forbidden`)
//! 2. target equals current status (no-op, not an error)
//! 3. transition policy (`InvalidTransition`)

use serde::Serialize;
use std::sync::Arc;

use super::{
    DefaultTransitionPolicy, LocationStatus, LocationStatusChange, RejectionReason, StatusImpact,
    Tenant, TenantError, TransitionPolicy, TransitionRequest,
};
use crate::domain::access::Actor;
use crate::domain::foundation::Timestamp;

const CHANGE_STATUS_ACTION: &str = "change location status";

/// Result of planning a status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// The tenant is already in the target status. Nothing is written.
    NoOp,
    /// Write this change atomically.
    Apply(LocationStatusChange),
}

/// Advisory answer to "what would happen if".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChangePreview {
    pub valid: bool,
    /// Explanation when `valid` is false.
    pub reason: Option<String>,
    pub rejection: Option<RejectionReason>,
    /// True when the target is the current status.
    pub no_op: bool,
    pub impact: StatusImpact,
}

/// Validates operational-status transitions against a pluggable policy.
#[derive(Clone)]
pub struct LifecycleStateMachine {
    policy: Arc<dyn TransitionPolicy>,
}

impl LifecycleStateMachine {
    pub fn new(policy: Arc<dyn TransitionPolicy>) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &dyn TransitionPolicy {
        self.policy.as_ref()
    }

    /// Plan a mutating status change.
    ///
    /// Blank reasons are treated as absent. The returned change carries
    /// `changed_at = now` and the actor as `changed_by`.
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the actor's role cannot change status
    /// - `InvalidTransition` if the policy rejects the request
    pub fn plan(
        &self,
        tenant: &Tenant,
        actor: &Actor,
        target: LocationStatus,
        reason: Option<&str>,
        reopening_date: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<TransitionPlan, TenantError> {
        if !actor.role.can_change_status() {
            return Err(TenantError::forbidden(
                actor.user_id.clone(),
                CHANGE_STATUS_ACTION,
            ));
        }

        let from = tenant.location_status;
        if from == target {
            return Ok(TransitionPlan::NoOp);
        }

        let reason = normalize_reason(reason);
        let request = TransitionRequest {
            from,
            to: target,
            reason,
            reopening_date,
            now,
        };
        self.policy
            .validate(&request)
            .map_err(|rejection| TenantError::invalid_transition(from, target, rejection))?;

        Ok(TransitionPlan::Apply(LocationStatusChange {
            tenant_id: tenant.id,
            from,
            to: target,
            changed_by: actor.user_id.clone(),
            changed_at: now,
            reason: reason.map(str::to_string),
            reopening_date,
        }))
    }

    /// Read-only variant of the capability, no-op and graph checks.
    ///
    /// Reason and reopening-date rules are not enforced here; they apply
    /// only to the real change.
    pub fn preview(&self, tenant: &Tenant, actor: &Actor, target: LocationStatus) -> StatusChangePreview {
        let from = tenant.location_status;
        let impact = StatusImpact::evaluate(self.policy.as_ref(), from, target);

        if !actor.role.can_change_status() {
            let err = TenantError::forbidden(actor.user_id.clone(), CHANGE_STATUS_ACTION);
            return StatusChangePreview {
                valid: false,
                reason: Some(err.message()),
                rejection: None,
                no_op: false,
                impact,
            };
        }

        if from == target {
            return StatusChangePreview {
                valid: true,
                reason: None,
                rejection: None,
                no_op: true,
                impact,
            };
        }

        match self.policy.validate_edge(from, target) {
            Ok(()) => StatusChangePreview {
                valid: true,
                reason: None,
                rejection: None,
                no_op: false,
                impact,
            },
            Err(rejection) => StatusChangePreview {
                valid: false,
                reason: Some(rejection.to_string()),
                rejection: Some(rejection),
                no_op: false,
                impact,
            },
        }
    }
}

impl Default for LifecycleStateMachine {
    fn default() -> Self {
        Self::new(Arc::new(DefaultTransitionPolicy))
    }
}

impl std::fmt::Debug for LifecycleStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleStateMachine").finish_non_exhaustive()
    }
}

fn normalize_reason(reason: Option<&str>) -> Option<&str> {
    reason.map(str::trim).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::access::{ActorRole, PlatformRole, TenantRole};
    use crate::domain::entitlement::catalog::test_support::standard_table;
    use crate::domain::foundation::UserId;
    use crate::domain::tenant::Provisioner;

    fn tenant_in(status: LocationStatus) -> Tenant {
        let table = standard_table();
        let mut tenant = Tenant::start_trial(
            UserId::new("owner-1").unwrap(),
            None,
            "Corner Books",
            table.baseline_tier(),
            table.trial(),
            Provisioner::Owner,
            Timestamp::now(),
        )
        .unwrap();
        tenant.location_status = status;
        tenant
    }

    fn actor(role: ActorRole) -> Actor {
        Actor::new(UserId::new("actor-1").unwrap(), role)
    }

    fn owner() -> Actor {
        actor(ActorRole::Tenant(TenantRole::Owner))
    }

    #[test]
    fn member_cannot_change_status() {
        let machine = LifecycleStateMachine::default();
        let result = machine.plan(
            &tenant_in(LocationStatus::Active),
            &actor(ActorRole::Tenant(TenantRole::Member)),
            LocationStatus::Closed,
            Some("Renovation"),
            None,
            Timestamp::now(),
        );
        assert!(matches!(result, Err(TenantError::Forbidden { .. })));
    }

    #[test]
    fn forbidden_is_checked_before_no_op() {
        let machine = LifecycleStateMachine::default();
        let result = machine.plan(
            &tenant_in(LocationStatus::Active),
            &actor(ActorRole::Platform(PlatformRole::Viewer)),
            LocationStatus::Active,
            None,
            None,
            Timestamp::now(),
        );
        assert!(matches!(result, Err(TenantError::Forbidden { .. })));
    }

    #[test]
    fn same_status_is_a_no_op() {
        let machine = LifecycleStateMachine::default();
        let plan = machine
            .plan(
                &tenant_in(LocationStatus::Closed),
                &owner(),
                LocationStatus::Closed,
                None,
                None,
                Timestamp::now(),
            )
            .unwrap();
        assert_eq!(plan, TransitionPlan::NoOp);
    }

    #[test]
    fn missing_reason_is_invalid_transition() {
        let machine = LifecycleStateMachine::default();
        let err = machine
            .plan(
                &tenant_in(LocationStatus::Active),
                &owner(),
                LocationStatus::Closed,
                Some("   "),
                None,
                Timestamp::now(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            TenantError::invalid_transition(
                LocationStatus::Active,
                LocationStatus::Closed,
                RejectionReason::ReasonRequired {
                    to: LocationStatus::Closed
                }
            )
        );
    }

    #[test]
    fn valid_close_produces_change() {
        let machine = LifecycleStateMachine::default();
        let tenant = tenant_in(LocationStatus::Active);
        let now = Timestamp::now();
        let reopen = now.add_days(10);
        let plan = machine
            .plan(
                &tenant,
                &actor(ActorRole::Platform(PlatformRole::Support)),
                LocationStatus::Closed,
                Some("  Renovation "),
                Some(reopen),
                now,
            )
            .unwrap();

        let TransitionPlan::Apply(change) = plan else {
            panic!("expected a change");
        };
        assert_eq!(change.tenant_id, tenant.id);
        assert_eq!(change.from, LocationStatus::Active);
        assert_eq!(change.to, LocationStatus::Closed);
        assert_eq!(change.reason.as_deref(), Some("Renovation"));
        assert_eq!(change.reopening_date, Some(reopen));
        assert_eq!(change.changed_at, now);
        assert_eq!(change.changed_by.as_str(), "actor-1");
    }

    #[test]
    fn preview_does_not_require_reason() {
        let machine = LifecycleStateMachine::default();
        let preview = machine.preview(&tenant_in(LocationStatus::Active), &owner(), LocationStatus::Closed);
        assert!(preview.valid);
        assert!(preview.reason.is_none());
        assert!(preview.impact.reason_required);
    }

    #[test]
    fn preview_reports_graph_rejection() {
        let machine = LifecycleStateMachine::default();
        let preview =
            machine.preview(&tenant_in(LocationStatus::Pending), &owner(), LocationStatus::Closed);
        assert!(!preview.valid);
        assert!(matches!(preview.rejection, Some(RejectionReason::NotAllowed { .. })));
        assert!(preview.reason.unwrap().contains("cannot move from pending to closed"));
    }

    #[test]
    fn preview_reports_forbidden_without_error() {
        let machine = LifecycleStateMachine::default();
        let preview = machine.preview(
            &tenant_in(LocationStatus::Active),
            &actor(ActorRole::Tenant(TenantRole::Viewer)),
            LocationStatus::Inactive,
        );
        assert!(!preview.valid);
        assert!(preview.reason.unwrap().contains("not allowed"));
    }

    #[test]
    fn preview_flags_no_op() {
        let machine = LifecycleStateMachine::default();
        let preview = machine.preview(&tenant_in(LocationStatus::Active), &owner(), LocationStatus::Active);
        assert!(preview.valid);
        assert!(preview.no_op);
        assert!(!preview.impact.triggers_directory_sync);
    }
}
