//! GetTenantHandler - Query handler for a single tenant.

use std::sync::Arc;

use super::TrialReconciler;
use crate::domain::foundation::TenantId;
use crate::domain::tenant::{Tenant, TenantError};

/// Query to fetch one tenant.
#[derive(Debug, Clone)]
pub struct GetTenantQuery {
    pub tenant_id: TenantId,
}

pub type GetTenantResult = Tenant;

/// Handler for reading a tenant. Trial state is reconciled on the way out.
pub struct GetTenantHandler {
    reconciler: Arc<TrialReconciler>,
}

impl GetTenantHandler {
    pub fn new(reconciler: Arc<TrialReconciler>) -> Self {
        Self { reconciler }
    }

    pub async fn handle(&self, query: GetTenantQuery) -> Result<GetTenantResult, TenantError> {
        self.reconciler.load(&query.tenant_id).await
    }
}
