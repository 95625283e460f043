//! In-memory DirectorySyncClient implementations.
//!
//! `RecordingDirectoryClient` captures every call and answers with a
//! scripted outcome. `DisabledDirectoryClient` is wired when no directory
//! endpoint is configured.

use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{DirectorySyncClient, DirectorySyncRequest, SyncResponse};

/// Scripted answer for every call.
#[derive(Debug, Clone)]
pub enum ScriptedSync {
    Synced,
    Skipped(String),
    Fail(String),
    /// Sleep before answering `Synced`.
    Delay(Duration),
}

pub struct RecordingDirectoryClient {
    outcome: ScriptedSync,
    calls: RwLock<Vec<DirectorySyncRequest>>,
}

impl RecordingDirectoryClient {
    pub fn new(outcome: ScriptedSync) -> Self {
        Self {
            outcome,
            calls: RwLock::new(Vec::new()),
        }
    }

    pub fn synced() -> Self {
        Self::new(ScriptedSync::Synced)
    }

    pub async fn calls(&self) -> Vec<DirectorySyncRequest> {
        self.calls.read().await.clone()
    }
}

/// Stand-in used when no directory endpoint is configured.
///
/// Every call is skipped; nothing is recorded.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledDirectoryClient;

#[async_trait]
impl DirectorySyncClient for DisabledDirectoryClient {
    async fn sync_status(&self, _request: &DirectorySyncRequest) -> Result<SyncResponse, DomainError> {
        Ok(SyncResponse::Skipped {
            reason: "directory sync is not configured".to_string(),
        })
    }
}

#[async_trait]
impl DirectorySyncClient for RecordingDirectoryClient {
    async fn sync_status(&self, request: &DirectorySyncRequest) -> Result<SyncResponse, DomainError> {
        self.calls.write().await.push(request.clone());
        match &self.outcome {
            ScriptedSync::Synced => Ok(SyncResponse::Synced),
            ScriptedSync::Skipped(reason) => Ok(SyncResponse::Skipped {
                reason: reason.clone(),
            }),
            ScriptedSync::Fail(message) => {
                Err(DomainError::new(ErrorCode::ExternalServiceError, message.clone()))
            }
            ScriptedSync::Delay(duration) => {
                tokio::time::sleep(*duration).await;
                Ok(SyncResponse::Synced)
            }
        }
    }
}
