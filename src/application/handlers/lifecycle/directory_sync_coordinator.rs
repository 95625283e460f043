//! DirectorySyncCoordinator - mirrors status changes to the directory.
//!
//! Runs after the primary change is committed and returned. Synced and
//! skipped outcomes are informational; failures are logged as errors.
//! No retries; an external scheduler may re-drive.

use std::sync::Arc;

use super::SideEffectError;
use crate::ports::{DirectorySyncClient, DirectorySyncRequest, SyncResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced,
    Skipped { reason: String },
    Failed(SideEffectError),
}

pub struct DirectorySyncCoordinator {
    client: Arc<dyn DirectorySyncClient>,
}

impl DirectorySyncCoordinator {
    pub fn new(client: Arc<dyn DirectorySyncClient>) -> Self {
        Self { client }
    }

    pub async fn propagate(&self, request: &DirectorySyncRequest) -> SyncOutcome {
        match self.client.sync_status(request).await {
            Ok(SyncResponse::Synced) => {
                tracing::info!(
                    tenant_id = %request.tenant_id,
                    status = %request.status,
                    "Directory status synced"
                );
                SyncOutcome::Synced
            }
            Ok(SyncResponse::Skipped { reason }) => {
                tracing::info!(
                    tenant_id = %request.tenant_id,
                    status = %request.status,
                    reason = %reason,
                    "Directory sync skipped"
                );
                SyncOutcome::Skipped { reason }
            }
            Err(err) => {
                tracing::error!(
                    tenant_id = %request.tenant_id,
                    status = %request.status,
                    reopening_date = ?request.reopening_date.map(|d| d.to_string()),
                    error = %err,
                    "Directory sync failed"
                );
                SyncOutcome::Failed(SideEffectError::DirectorySync(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{RecordingDirectoryClient, ScriptedSync};
    use crate::domain::foundation::TenantId;
    use crate::domain::tenant::LocationStatus;

    fn request() -> DirectorySyncRequest {
        DirectorySyncRequest {
            tenant_id: TenantId::new(),
            status: LocationStatus::Closed,
            reopening_date: None,
        }
    }

    #[tokio::test]
    async fn synced_outcome() {
        let client = Arc::new(RecordingDirectoryClient::synced());
        let coordinator = DirectorySyncCoordinator::new(client.clone());
        assert_eq!(coordinator.propagate(&request()).await, SyncOutcome::Synced);
        assert_eq!(client.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn skipped_is_not_an_error() {
        let client = Arc::new(RecordingDirectoryClient::new(ScriptedSync::Skipped(
            "not listed".to_string(),
        )));
        let outcome = DirectorySyncCoordinator::new(client).propagate(&request()).await;
        assert_eq!(
            outcome,
            SyncOutcome::Skipped {
                reason: "not listed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failure_is_reported_once_without_retry() {
        let client = Arc::new(RecordingDirectoryClient::new(ScriptedSync::Fail(
            "503 from directory".to_string(),
        )));
        let outcome = DirectorySyncCoordinator::new(client.clone())
            .propagate(&request())
            .await;
        assert!(matches!(outcome, SyncOutcome::Failed(SideEffectError::DirectorySync(_))));
        assert_eq!(client.calls().await.len(), 1);
    }
}
