//! Side-effect queue and worker configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::handlers::lifecycle::SideEffectWorkerConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct SideEffectConfig {
    /// Jobs held before new submissions are dropped.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Upper bound for one history append or directory call.
    #[serde(default = "default_job_timeout_ms")]
    pub job_timeout_ms: u64,
}

impl SideEffectConfig {
    pub fn job_timeout(&self) -> Duration {
        Duration::from_millis(self.job_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.queue_capacity == 0 {
            return Err(ValidationError::InvalidQueueCapacity);
        }
        if self.job_timeout_ms == 0 {
            return Err(ValidationError::InvalidTimeout("side_effects.job_timeout_ms"));
        }
        Ok(())
    }

    pub fn worker_config(&self) -> SideEffectWorkerConfig {
        SideEffectWorkerConfig::default().with_job_timeout(self.job_timeout())
    }
}

impl Default for SideEffectConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            job_timeout_ms: default_job_timeout_ms(),
        }
    }
}

fn default_queue_capacity() -> usize {
    256
}

fn default_job_timeout_ms() -> u64 {
    5_000
}
