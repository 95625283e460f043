//! HTTP directory client.
//!
//! Pushes a location's status to the listing service with one `PUT` per
//! change. No retries happen here or above; a failed call is reported and
//! the next change carries the latest status anyway.
//!
//! # Configuration
//!
//! ```ignore
//! let config = DirectoryClientConfig::new("https://directory.example.com/api", api_key)
//!     .with_timeout(Duration::from_secs(3));
//! let client = HttpDirectoryClient::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::domain::tenant::{DirectoryPresence, LocationStatus};
use crate::ports::{DirectorySyncClient, DirectorySyncRequest, SyncResponse};

/// Connection settings for the listing service.
#[derive(Debug, Clone)]
pub struct DirectoryClientConfig {
    pub base_url: String,
    api_key: Secret<String>,
    pub timeout: Duration,
}

impl DirectoryClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: Secret::new(api_key.into()),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Wire body of a status push.
#[derive(Debug, Serialize)]
struct StatusPayload {
    status: LocationStatus,
    presence: DirectoryPresence,
    #[serde(skip_serializing_if = "Option::is_none")]
    reopening_date: Option<Timestamp>,
}

/// Optional acknowledgement body.
#[derive(Debug, Default, Deserialize)]
struct SyncAck {
    #[serde(default)]
    skipped: bool,
    #[serde(default)]
    reason: Option<String>,
}

pub struct HttpDirectoryClient {
    config: DirectoryClientConfig,
    client: Client,
}

impl HttpDirectoryClient {
    /// # Errors
    ///
    /// `ExternalServiceError` if the HTTP client cannot be built.
    pub fn new(config: DirectoryClientConfig) -> Result<Self, DomainError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            DomainError::new(
                ErrorCode::ExternalServiceError,
                format!("Failed to create directory HTTP client: {}", e),
            )
        })?;
        Ok(Self { config, client })
    }

    fn status_url(&self, request: &DirectorySyncRequest) -> String {
        format!("{}/locations/{}/status", self.config.base_url, request.tenant_id)
    }
}

fn external(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::ExternalServiceError, message)
}

/// Map an HTTP answer onto the sync outcome.
///
/// A 404 means the location is not listed, which is a skip rather than a
/// failure. Any other non-success status is a failure.
fn interpret(status: StatusCode, body: &str) -> Result<SyncResponse, DomainError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(SyncResponse::Skipped {
            reason: "location is not listed in the directory".to_string(),
        });
    }
    if !status.is_success() {
        return Err(external(format!("Directory returned {}: {}", status, body.trim())));
    }

    let ack = if body.trim().is_empty() {
        SyncAck::default()
    } else {
        serde_json::from_str::<SyncAck>(body)
            .map_err(|e| external(format!("Failed to parse directory response: {}", e)))?
    };

    if ack.skipped {
        Ok(SyncResponse::Skipped {
            reason: ack.reason.unwrap_or_else(|| "declined by directory".to_string()),
        })
    } else {
        Ok(SyncResponse::Synced)
    }
}

#[async_trait]
impl DirectorySyncClient for HttpDirectoryClient {
    async fn sync_status(&self, request: &DirectorySyncRequest) -> Result<SyncResponse, DomainError> {
        let payload = StatusPayload {
            status: request.status,
            presence: DirectoryPresence::for_status(request.status),
            reopening_date: request.reopening_date,
        };

        let response = self
            .client
            .put(self.status_url(request))
            .bearer_auth(self.config.api_key())
            .json(&payload)
            .send()
            .await
            .map_err(|e| external(format!("Directory request failed: {}", e)))?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        interpret(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::TenantId;

    #[test]
    fn base_url_loses_trailing_slash() {
        let config = DirectoryClientConfig::new("https://dir.example.com/api/", "key");
        assert_eq!(config.base_url, "https://dir.example.com/api");
    }

    #[test]
    fn api_key_is_not_debug_printed() {
        let config = DirectoryClientConfig::new("https://dir.example.com", "super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn status_url_contains_tenant() {
        let client =
            HttpDirectoryClient::new(DirectoryClientConfig::new("https://dir.example.com", "k")).unwrap();
        let request = DirectorySyncRequest {
            tenant_id: TenantId::new(),
            status: LocationStatus::Closed,
            reopening_date: None,
        };
        assert_eq!(
            client.status_url(&request),
            format!("https://dir.example.com/locations/{}/status", request.tenant_id)
        );
    }

    #[test]
    fn empty_success_body_is_synced() {
        assert_eq!(interpret(StatusCode::NO_CONTENT, "").unwrap(), SyncResponse::Synced);
    }

    #[test]
    fn ack_can_skip() {
        let result = interpret(StatusCode::OK, r#"{"skipped":true,"reason":"unclaimed listing"}"#);
        assert_eq!(
            result.unwrap(),
            SyncResponse::Skipped {
                reason: "unclaimed listing".to_string()
            }
        );
    }

    #[test]
    fn not_found_is_skip() {
        assert!(matches!(
            interpret(StatusCode::NOT_FOUND, "").unwrap(),
            SyncResponse::Skipped { .. }
        ));
    }

    #[test]
    fn server_error_is_external_failure() {
        let err = interpret(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert!(err.message.contains("upstream down"));
    }

    #[test]
    fn payload_omits_missing_reopening_date() {
        let payload = StatusPayload {
            status: LocationStatus::Inactive,
            presence: DirectoryPresence::Hidden,
            reopening_date: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"status":"inactive","presence":"hidden"}"#);
    }
}
