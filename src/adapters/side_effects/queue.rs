//! SideEffectQueue - bounded in-process queue for post-commit work.
//!
//! Submission uses `try_send`: a full queue rejects the job instead of
//! applying backpressure to the request path. The receiving half is handed
//! to a `SideEffectWorker`.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::ports::{DispatchError, SideEffectDispatcher, SideEffectJob};

/// Sending half of the side effect queue.
#[derive(Clone)]
pub struct SideEffectQueue {
    sender: mpsc::Sender<SideEffectJob>,
}

impl SideEffectQueue {
    /// Create a queue holding at most `capacity` pending jobs.
    ///
    /// A capacity of zero is raised to one.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<SideEffectJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Free slots right now.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }
}

impl SideEffectDispatcher for SideEffectQueue {
    fn dispatch(&self, job: SideEffectJob) -> Result<(), DispatchError> {
        self.sender.try_send(job).map_err(|err| match err {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::Closed,
        })
    }
}
