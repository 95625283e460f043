//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::entitlement::CatalogError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Failed to read tier catalog {path}: {source}")]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tier catalog is not valid YAML: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    #[error("Tier catalog is inconsistent: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Tier catalog entry is invalid: {0}")]
    CatalogEntry(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Directory base URL must be http(s)")]
    InvalidDirectoryUrl,

    #[error("Directory base URL must use HTTPS in production")]
    DirectoryMustBeHttps,

    #[error("Invalid timeout: {0}")]
    InvalidTimeout(&'static str),

    #[error("Side effect queue capacity must be at least 1")]
    InvalidQueueCapacity,

    #[error("Invalid log filter: {0}")]
    InvalidLogFilter(String),
}
