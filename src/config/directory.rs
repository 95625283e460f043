//! External directory configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::DirectoryClientConfig;

/// Listing-service connection.
///
/// When absent, status changes are not mirrored anywhere.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryConfig {
    pub base_url: String,

    pub api_key: Secret<String>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl DirectoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("directory.base_url"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidDirectoryUrl);
        }
        if production && !self.base_url.starts_with("https://") {
            return Err(ValidationError::DirectoryMustBeHttps);
        }
        if self.api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("directory.api_key"));
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("directory.timeout_secs"));
        }
        Ok(())
    }

    /// Settings for the HTTP adapter.
    pub fn client_config(&self) -> DirectoryClientConfig {
        DirectoryClientConfig::new(&self.base_url, self.api_key.expose_secret().as_str())
            .with_timeout(self.timeout())
    }
}

fn default_timeout() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, key: &str) -> DirectoryConfig {
        DirectoryConfig {
            base_url: url.to_string(),
            api_key: Secret::new(key.to_string()),
            timeout_secs: 5,
        }
    }

    #[test]
    fn https_url_with_key_is_valid_in_production() {
        assert!(config("https://dir.example.com", "k").validate(true).is_ok());
    }

    #[test]
    fn plain_http_is_rejected_in_production_only() {
        let c = config("http://localhost:9000", "k");
        assert!(c.validate(false).is_ok());
        assert!(matches!(c.validate(true), Err(ValidationError::DirectoryMustBeHttps)));
    }

    #[test]
    fn empty_key_is_rejected() {
        assert!(matches!(
            config("https://dir.example.com", "").validate(false),
            Err(ValidationError::MissingRequired("directory.api_key"))
        ));
    }

    #[test]
    fn client_config_carries_timeout() {
        let mut c = config("https://dir.example.com/", "k");
        c.timeout_secs = 2;
        let client = c.client_config();
        assert_eq!(client.timeout, Duration::from_secs(2));
        assert_eq!(client.base_url, "https://dir.example.com");
    }
}
