//! Operational status of the physical location.
//!
//! The enumeration is closed; which edges between states are allowed is
//! decided by a [`TransitionPolicy`](super::TransitionPolicy). The graph
//! declared here through `StateMachine` is the one the default policy uses.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Operational status of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationStatus {
    /// Set up but not yet opened to the public.
    Pending,

    /// Open for business.
    Active,

    /// Paused by the owner; hidden but not closed.
    Inactive,

    /// Closed, possibly with a planned reopening date.
    Closed,

    /// Retired. Kept for records only.
    Archived,
}

impl LocationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationStatus::Pending => "pending",
            LocationStatus::Active => "active",
            LocationStatus::Inactive => "inactive",
            LocationStatus::Closed => "closed",
            LocationStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(LocationStatus::Pending),
            "active" => Some(LocationStatus::Active),
            "inactive" => Some(LocationStatus::Inactive),
            "closed" => Some(LocationStatus::Closed),
            "archived" => Some(LocationStatus::Archived),
            _ => None,
        }
    }

    pub const ALL: [LocationStatus; 5] = [
        LocationStatus::Pending,
        LocationStatus::Active,
        LocationStatus::Inactive,
        LocationStatus::Closed,
        LocationStatus::Archived,
    ];
}

impl std::fmt::Display for LocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for LocationStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use LocationStatus::*;
        match self {
            Pending => vec![Active, Archived],
            Active => vec![Inactive, Closed, Archived],
            Inactive => vec![Active, Closed, Archived],
            Closed => vec![Active, Archived],
            Archived => vec![Inactive],
        }
    }
}
