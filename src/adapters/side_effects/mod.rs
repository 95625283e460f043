//! Side effect submission.

mod queue;

pub use queue::SideEffectQueue;
