//! Pluggable location-status transition policy.
//!
//! The lifecycle state machine never hard-codes edges. It asks a
//! [`TransitionPolicy`] which targets are reachable and whether a concrete
//! request (reason, reopening date) satisfies the rules.

use serde::Serialize;
use std::fmt;

use super::LocationStatus;
use crate::domain::foundation::{StateMachine, Timestamp};

/// Why a policy refused a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    /// `to` is not in `allowed_next_states(from)`.
    NotAllowed {
        from: LocationStatus,
        to: LocationStatus,
        allowed: Vec<LocationStatus>,
    },
    /// The target requires a non-blank reason.
    ReasonRequired { to: LocationStatus },
    /// A reopening date was supplied for a status that cannot carry one.
    ReopeningDateNotApplicable { to: LocationStatus },
    /// The reopening date is not after the change time.
    ReopeningDateNotInFuture,
    /// The row moved to another status between planning and the write.
    StaleStatus {
        expected: LocationStatus,
        current: LocationStatus,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::NotAllowed { from, to, allowed } => {
                let allowed = allowed
                    .iter()
                    .map(LocationStatus::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "cannot move from {} to {} (allowed: {})",
                    from,
                    to,
                    if allowed.is_empty() { "none" } else { &allowed }
                )
            }
            RejectionReason::ReasonRequired { to } => {
                write!(f, "a reason is required to move to {}", to)
            }
            RejectionReason::ReopeningDateNotApplicable { to } => {
                write!(f, "a reopening date cannot be set when moving to {}", to)
            }
            RejectionReason::ReopeningDateNotInFuture => {
                write!(f, "reopening date must be in the future")
            }
            RejectionReason::StaleStatus { expected, current } => write!(
                f,
                "status changed concurrently (expected {}, now {})",
                expected, current
            ),
        }
    }
}

/// A concrete transition to validate.
#[derive(Debug, Clone, Copy)]
pub struct TransitionRequest<'a> {
    pub from: LocationStatus,
    pub to: LocationStatus,
    /// Already trimmed; blank reasons arrive as `None`.
    pub reason: Option<&'a str>,
    pub reopening_date: Option<Timestamp>,
    pub now: Timestamp,
}

/// Transition rules for location status.
///
/// Implementors supply the graph and the reason rule. The provided
/// `validate_edge` and `validate` compose them and rarely need overriding.
pub trait TransitionPolicy: Send + Sync {
    /// Targets reachable from `from`, excluding `from` itself.
    fn allowed_next_states(&self, from: LocationStatus) -> Vec<LocationStatus>;

    /// Whether moving `from -> to` needs a reason.
    fn requires_reason(&self, from: LocationStatus, to: LocationStatus) -> bool;

    /// Whether `to` may carry a reopening date.
    fn accepts_reopening_date(&self, to: LocationStatus) -> bool {
        to == LocationStatus::Closed
    }

    /// Graph check only. Used by previews, where no reason is given yet.
    fn validate_edge(&self, from: LocationStatus, to: LocationStatus) -> Result<(), RejectionReason> {
        let allowed = self.allowed_next_states(from);
        if allowed.contains(&to) {
            Ok(())
        } else {
            Err(RejectionReason::NotAllowed { from, to, allowed })
        }
    }

    /// Full check for a mutating change.
    fn validate(&self, request: &TransitionRequest<'_>) -> Result<(), RejectionReason> {
        self.validate_edge(request.from, request.to)?;

        if self.requires_reason(request.from, request.to) && request.reason.is_none() {
            return Err(RejectionReason::ReasonRequired { to: request.to });
        }

        if let Some(date) = request.reopening_date {
            if !self.accepts_reopening_date(request.to) {
                return Err(RejectionReason::ReopeningDateNotApplicable { to: request.to });
            }
            if !date.is_after(&request.now) {
                return Err(RejectionReason::ReopeningDateNotInFuture);
            }
        }

        Ok(())
    }
}

/// Product default: the `LocationStatus` state machine graph, with a
/// reason required for closing or archiving.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransitionPolicy;

impl TransitionPolicy for DefaultTransitionPolicy {
    fn allowed_next_states(&self, from: LocationStatus) -> Vec<LocationStatus> {
        from.valid_transitions()
    }

    fn requires_reason(&self, _from: LocationStatus, to: LocationStatus) -> bool {
        matches!(to, LocationStatus::Closed | LocationStatus::Archived)
    }
}

/// How the external directory shows a location in a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectoryPresence {
    /// Listed and shown as open.
    Listed,
    /// Listed but marked closed, with the reopening date if known.
    ListedAsClosed,
    /// Not shown.
    Hidden,
    /// Removed from the directory.
    Removed,
}

impl DirectoryPresence {
    pub fn for_status(status: LocationStatus) -> Self {
        match status {
            LocationStatus::Active => DirectoryPresence::Listed,
            LocationStatus::Closed => DirectoryPresence::ListedAsClosed,
            LocationStatus::Pending | LocationStatus::Inactive => DirectoryPresence::Hidden,
            LocationStatus::Archived => DirectoryPresence::Removed,
        }
    }
}

/// Advisory description of what a transition would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusImpact {
    pub from: LocationStatus,
    pub to: LocationStatus,
    pub directory_before: DirectoryPresence,
    pub directory_after: DirectoryPresence,
    /// A directory sync would be submitted if applied.
    pub triggers_directory_sync: bool,
    /// The real change will demand a reason.
    pub reason_required: bool,
    /// A reopening date may be supplied with the real change.
    pub accepts_reopening_date: bool,
    /// Existing closure reason and reopening date would be cleared.
    pub clears_closure: bool,
}

impl StatusImpact {
    pub fn evaluate(policy: &dyn TransitionPolicy, from: LocationStatus, to: LocationStatus) -> Self {
        Self {
            from,
            to,
            directory_before: DirectoryPresence::for_status(from),
            directory_after: DirectoryPresence::for_status(to),
            triggers_directory_sync: from != to,
            reason_required: from != to && policy.requires_reason(from, to),
            accepts_reopening_date: policy.accepts_reopening_date(to),
            clears_closure: from == LocationStatus::Closed && to != LocationStatus::Closed,
        }
    }
}
