//! ChangeStatusHandler - Command handler for location status changes.
//!
//! The primary outcome is decided by the atomic row update. History and
//! directory sync are submitted afterwards and cannot change it.

use std::sync::Arc;

use crate::application::handlers::tenant::TrialReconciler;
use crate::domain::access::Actor;
use crate::domain::foundation::{TenantId, Timestamp};
use crate::domain::tenant::{
    LifecycleStateMachine, LocationStatus, LocationStatusChange, RejectionReason,
    StatusHistoryEntry, Tenant, TenantError, TransitionPlan,
};
use crate::ports::{
    DirectorySyncRequest, SideEffectDispatcher, SideEffectJob, StatusUpdateOutcome,
    TenantRepository,
};

/// Command to change a location's operational status.
#[derive(Debug, Clone)]
pub struct ChangeStatusCommand {
    pub tenant_id: TenantId,
    pub actor: Actor,
    pub target: LocationStatus,
    pub reason: Option<String>,
    pub reopening_date: Option<Timestamp>,
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusChangeOutcome {
    /// Row updated; side effects submitted.
    Changed {
        tenant: Tenant,
        change: LocationStatusChange,
    },
    /// Already in the target status. Nothing written or submitted.
    NoOp { tenant: Tenant },
}

impl StatusChangeOutcome {
    pub fn tenant(&self) -> &Tenant {
        match self {
            StatusChangeOutcome::Changed { tenant, .. } | StatusChangeOutcome::NoOp { tenant } => {
                tenant
            }
        }
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self, StatusChangeOutcome::NoOp { .. })
    }
}

pub struct ChangeStatusHandler {
    repository: Arc<dyn TenantRepository>,
    reconciler: Arc<TrialReconciler>,
    state_machine: LifecycleStateMachine,
    dispatcher: Arc<dyn SideEffectDispatcher>,
}

impl ChangeStatusHandler {
    pub fn new(
        repository: Arc<dyn TenantRepository>,
        reconciler: Arc<TrialReconciler>,
        state_machine: LifecycleStateMachine,
        dispatcher: Arc<dyn SideEffectDispatcher>,
    ) -> Self {
        Self {
            repository,
            reconciler,
            state_machine,
            dispatcher,
        }
    }

    pub async fn handle(&self, cmd: ChangeStatusCommand) -> Result<StatusChangeOutcome, TenantError> {
        // 1. Load (trial reconciled on the way)
        let tenant = self.reconciler.load(&cmd.tenant_id).await?;

        // 2. Role gate, no-op detection, policy
        let plan = self.state_machine.plan(
            &tenant,
            &cmd.actor,
            cmd.target,
            cmd.reason.as_deref(),
            cmd.reopening_date,
            Timestamp::now(),
        )?;

        let change = match plan {
            TransitionPlan::NoOp => return Ok(StatusChangeOutcome::NoOp { tenant }),
            TransitionPlan::Apply(change) => change,
        };

        // 3. Atomic single-row write, guarded on the planned-from status
        let updated = match self.repository.update_location_status(&change).await? {
            StatusUpdateOutcome::Updated(tenant) => tenant,
            StatusUpdateOutcome::NotFound => return Err(TenantError::not_found(cmd.tenant_id)),
            StatusUpdateOutcome::Conflict { current } => {
                return Err(TenantError::invalid_transition(
                    change.from,
                    change.to,
                    RejectionReason::StaleStatus {
                        expected: change.from,
                        current,
                    },
                ));
            }
        };

        tracing::info!(
            tenant_id = %updated.id,
            from = %change.from,
            to = %change.to,
            changed_by = %change.changed_by,
            "Location status changed"
        );

        // 4. Fire-and-forget side effects
        self.submit(SideEffectJob::RecordHistory(StatusHistoryEntry::from_change(&change)));
        self.submit(SideEffectJob::SyncDirectory(DirectorySyncRequest {
            tenant_id: updated.id,
            status: updated.location_status,
            reopening_date: updated.reopening_date,
        }));

        Ok(StatusChangeOutcome::Changed {
            tenant: updated,
            change,
        })
    }

    fn submit(&self, job: SideEffectJob) {
        let kind = job.kind();
        if let Err(err) = self.dispatcher.dispatch(job) {
            tracing::warn!(job = kind, error = %err, "Side effect dropped");
        }
    }
}
