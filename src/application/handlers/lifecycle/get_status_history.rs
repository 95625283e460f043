//! GetStatusHistoryHandler - Query handler for a tenant's status history.
//!
//! History is best-effort. An unavailable store yields an empty list rather
//! than an error, since nothing on the primary path depends on it.

use std::sync::Arc;

use crate::application::handlers::tenant::TrialReconciler;
use crate::domain::access::Actor;
use crate::domain::foundation::TenantId;
use crate::domain::tenant::{StatusHistoryEntry, TenantError};
use crate::ports::{HistoryAvailability, StatusHistoryStore};

/// Largest page a caller may request.
pub const MAX_HISTORY_LIMIT: u32 = 100;

const VIEW_HISTORY_ACTION: &str = "view status history";

#[derive(Debug, Clone)]
pub struct GetStatusHistoryQuery {
    pub tenant_id: TenantId,
    pub actor: Actor,
    /// Clamped to [`MAX_HISTORY_LIMIT`]; zero is rejected.
    pub limit: u32,
}

/// Entries newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetStatusHistoryResult {
    pub entries: Vec<StatusHistoryEntry>,
    /// False when the store reported itself unavailable.
    pub history_available: bool,
}

pub struct GetStatusHistoryHandler {
    reconciler: Arc<TrialReconciler>,
    history: Arc<dyn StatusHistoryStore>,
}

impl GetStatusHistoryHandler {
    pub fn new(reconciler: Arc<TrialReconciler>, history: Arc<dyn StatusHistoryStore>) -> Self {
        Self { reconciler, history }
    }

    pub async fn handle(&self, query: GetStatusHistoryQuery) -> Result<GetStatusHistoryResult, TenantError> {
        if !query.actor.role.can_view_history() {
            return Err(TenantError::forbidden(query.actor.user_id, VIEW_HISTORY_ACTION));
        }
        if query.limit == 0 {
            return Err(TenantError::validation("limit", "must be at least 1"));
        }

        self.reconciler.load(&query.tenant_id).await?;

        if let HistoryAvailability::Unavailable { reason } = self.history.availability().await {
            tracing::debug!(
                tenant_id = %query.tenant_id,
                reason = %reason,
                "Status history unavailable, returning empty list"
            );
            return Ok(GetStatusHistoryResult {
                entries: Vec::new(),
                history_available: false,
            });
        }

        let limit = query.limit.min(MAX_HISTORY_LIMIT);
        let entries = self.history.list_recent(&query.tenant_id, limit).await?;

        Ok(GetStatusHistoryResult {
            entries,
            history_available: true,
        })
    }
}
