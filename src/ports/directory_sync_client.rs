//! Directory sync client port.
//!
//! Mirrors a location's operational status into the external listing
//! service. Only the shape of the call is defined here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, TenantId, Timestamp};
use crate::domain::tenant::LocationStatus;

/// One status mirror call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySyncRequest {
    pub tenant_id: TenantId,
    pub status: LocationStatus,
    pub reopening_date: Option<Timestamp>,
}

/// Non-error outcomes of a sync call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResponse {
    /// The directory now mirrors the status.
    Synced,
    /// The directory declined; the sync does not apply to this tenant.
    Skipped { reason: String },
}

/// Client port for the external directory.
///
/// Failures are returned as `ExternalServiceError`. Callers do not retry.
#[async_trait]
pub trait DirectorySyncClient: Send + Sync {
    async fn sync_status(&self, request: &DirectorySyncRequest) -> Result<SyncResponse, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sync_client_is_object_safe() {
        fn _accepts_dyn(_client: &dyn DirectorySyncClient) {}
    }

    #[test]
    fn request_serializes_status_snake_case() {
        let request = DirectorySyncRequest {
            tenant_id: TenantId::new(),
            status: LocationStatus::Closed,
            reopening_date: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "closed");
        assert!(json["reopening_date"].is_null());
    }
}
