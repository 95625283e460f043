//! SideEffectWorker - drains the side effect queue.
//!
//! Jobs run one at a time in submission order, each exactly once under its
//! own timeout. A timed-out job is abandoned and logged; the worker moves
//! on to the next one.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `job_timeout` | 5s | Upper bound for one history append or directory call |
//!
//! ## Graceful Shutdown
//!
//! On shutdown the worker runs the jobs already queued, then stops.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use super::{DirectorySyncCoordinator, HistoryRecorder, RecordOutcome, SideEffectError, SyncOutcome};
use crate::ports::SideEffectJob;

#[derive(Debug, Clone)]
pub struct SideEffectWorkerConfig {
    pub job_timeout: Duration,
}

impl Default for SideEffectWorkerConfig {
    fn default() -> Self {
        Self {
            job_timeout: Duration::from_secs(5),
        }
    }
}

impl SideEffectWorkerConfig {
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = timeout;
        self
    }
}

/// Result of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    History(RecordOutcome),
    Directory(SyncOutcome),
    TimedOut(SideEffectError),
}

pub struct SideEffectWorker {
    receiver: mpsc::Receiver<SideEffectJob>,
    history: HistoryRecorder,
    directory: DirectorySyncCoordinator,
    config: SideEffectWorkerConfig,
}

impl SideEffectWorker {
    pub fn new(
        receiver: mpsc::Receiver<SideEffectJob>,
        history: HistoryRecorder,
        directory: DirectorySyncCoordinator,
        config: SideEffectWorkerConfig,
    ) -> Self {
        Self {
            receiver,
            history,
            directory,
            config,
        }
    }

    /// Run until shutdown is signalled or every sender is dropped.
    ///
    /// Returns the number of jobs processed.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut processed = 0;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        processed += self.drain().await;
                        tracing::info!(processed, "Side effect worker stopped");
                        return processed;
                    }
                }

                job = self.receiver.recv() => {
                    match job {
                        Some(job) => {
                            self.process(job).await;
                            processed += 1;
                        }
                        None => {
                            tracing::info!(processed, "Side effect queue closed");
                            return processed;
                        }
                    }
                }
            }
        }
    }

    /// Run the jobs already queued without waiting for new ones.
    async fn drain(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(job) = self.receiver.try_recv() {
            self.process(job).await;
            drained += 1;
        }
        drained
    }

    /// Run one job under the configured timeout.
    pub async fn process(&self, job: SideEffectJob) -> JobOutcome {
        let kind = job.kind();
        let timeout = self.config.job_timeout;

        let work = async {
            match &job {
                SideEffectJob::RecordHistory(entry) => {
                    JobOutcome::History(self.history.record(entry).await)
                }
                SideEffectJob::SyncDirectory(request) => {
                    JobOutcome::Directory(self.directory.propagate(request).await)
                }
            }
        };

        match tokio::time::timeout(timeout, work).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let err = SideEffectError::TimedOut {
                    job: kind,
                    after_ms: timeout.as_millis() as u64,
                };
                tracing::error!(job = kind, job_detail = ?job, error = %err, "Side effect timed out");
                JobOutcome::TimedOut(err)
            }
        }
    }
}
