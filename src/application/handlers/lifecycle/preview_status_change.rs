//! PreviewStatusChangeHandler - Query handler for "what would happen if".
//!
//! Read-only. Never writes, never submits side effects.

use std::sync::Arc;

use crate::application::handlers::tenant::TrialReconciler;
use crate::domain::access::Actor;
use crate::domain::foundation::TenantId;
use crate::domain::tenant::{LifecycleStateMachine, LocationStatus, StatusChangePreview, TenantError};

/// Query for an advisory transition check.
#[derive(Debug, Clone)]
pub struct PreviewStatusChangeQuery {
    pub tenant_id: TenantId,
    pub actor: Actor,
    pub target: LocationStatus,
}

pub type PreviewStatusChangeResult = StatusChangePreview;

pub struct PreviewStatusChangeHandler {
    reconciler: Arc<TrialReconciler>,
    state_machine: LifecycleStateMachine,
}

impl PreviewStatusChangeHandler {
    pub fn new(reconciler: Arc<TrialReconciler>, state_machine: LifecycleStateMachine) -> Self {
        Self {
            reconciler,
            state_machine,
        }
    }

    /// Only a missing tenant is an error. Every refusal is reported
    /// in-band with `valid == false`.
    pub async fn handle(
        &self,
        query: PreviewStatusChangeQuery,
    ) -> Result<PreviewStatusChangeResult, TenantError> {
        let tenant = self.reconciler.load(&query.tenant_id).await?;
        Ok(self.state_machine.preview(&tenant, &query.actor, query.target))
    }
}
