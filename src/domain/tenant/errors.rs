//! Tenant-specific error types.
//!
//! Primary-path errors for lifecycle, entitlement and creation operations.
//! Side-effect failures have their own type in the application layer and
//! never become a `TenantError`.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | InvalidTransition | 409 |
//! | LimitReached | 409 |
//! | Configuration | 500 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use super::{LocationStatus, RejectionReason};
use crate::domain::entitlement::{CatalogError, Limit};
use crate::domain::foundation::{DomainError, ErrorCode, TenantId, UserId, ValidationError};

/// Tenant-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantError {
    /// Tenant was not found.
    NotFound(TenantId),

    /// Actor's role lacks the capability.
    Forbidden { actor: UserId, action: String },

    /// Transition policy refused the change.
    InvalidTransition {
        from: LocationStatus,
        to: LocationStatus,
        rejection: RejectionReason,
    },

    /// The owner already holds as many locations as allowed.
    LimitReached {
        owner: UserId,
        limit: Limit,
        current: u32,
    },

    /// Tier catalog is broken (cycle, dangling parent).
    Configuration(CatalogError),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl TenantError {
    pub fn not_found(id: TenantId) -> Self {
        TenantError::NotFound(id)
    }

    pub fn forbidden(actor: UserId, action: impl Into<String>) -> Self {
        TenantError::Forbidden {
            actor,
            action: action.into(),
        }
    }

    pub fn invalid_transition(
        from: LocationStatus,
        to: LocationStatus,
        rejection: RejectionReason,
    ) -> Self {
        TenantError::InvalidTransition {
            from,
            to,
            rejection,
        }
    }

    pub fn limit_reached(owner: UserId, limit: Limit, current: u32) -> Self {
        TenantError::LimitReached {
            owner,
            limit,
            current,
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        TenantError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        TenantError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TenantError::NotFound(_) => ErrorCode::TenantNotFound,
            TenantError::Forbidden { .. } => ErrorCode::Forbidden,
            TenantError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            TenantError::LimitReached { .. } => ErrorCode::CreationLimitReached,
            TenantError::Configuration(_) => ErrorCode::ConfigurationError,
            TenantError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            TenantError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            TenantError::NotFound(id) => format!("Tenant not found: {}", id),
            TenantError::Forbidden { actor, action } => {
                format!("User {} is not allowed to {}", actor, action)
            }
            TenantError::InvalidTransition { rejection, .. } => {
                format!("Invalid status change: {}", rejection)
            }
            TenantError::LimitReached {
                owner,
                limit,
                current,
            } => format!(
                "Owner {} has reached the location limit ({} of {})",
                owner, current, limit
            ),
            TenantError::Configuration(err) => format!("Configuration error: {}", err),
            TenantError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            TenantError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, TenantError::Infrastructure(_))
    }
}

impl std::fmt::Display for TenantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for TenantError {}

impl From<CatalogError> for TenantError {
    fn from(err: CatalogError) -> Self {
        TenantError::Configuration(err)
    }
}

impl From<ValidationError> for TenantError {
    fn from(err: ValidationError) -> Self {
        TenantError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for TenantError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => TenantError::ValidationFailed {
                field: err.field.unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => TenantError::Infrastructure(err.to_string()),
        }
    }
}

impl From<TenantError> for DomainError {
    fn from(err: TenantError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
