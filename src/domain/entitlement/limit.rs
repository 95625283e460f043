//! Quota value that is either a finite cap or unbounded.

use serde::{Deserialize, Serialize};

/// A resource cap.
///
/// Stored and serialized as `Option<u32>` where `null` means unbounded, which
/// matches the nullable limit columns on tier rows. `Limited(n) < Unbounded`
/// for every `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum Limit {
    Limited(u32),
    Unbounded,
}

impl Limit {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, Limit::Unbounded)
    }

    /// Returns the finite cap, or `None` when unbounded.
    pub fn value(&self) -> Option<u32> {
        match self {
            Limit::Limited(n) => Some(*n),
            Limit::Unbounded => None,
        }
    }

    /// `max(0, limit - used)`; unbounded stays unbounded.
    pub fn remaining(&self, used: u32) -> Limit {
        match self {
            Limit::Limited(n) => Limit::Limited(n.saturating_sub(used)),
            Limit::Unbounded => Limit::Unbounded,
        }
    }

    /// Whether one more unit fits when `used` units are already taken.
    pub fn allows_another(&self, used: u32) -> bool {
        match self {
            Limit::Limited(n) => used < *n,
            Limit::Unbounded => true,
        }
    }
}

impl From<Option<u32>> for Limit {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(n) => Limit::Limited(n),
            None => Limit::Unbounded,
        }
    }
}

impl From<Limit> for Option<u32> {
    fn from(limit: Limit) -> Self {
        limit.value()
    }
}

impl std::fmt::Display for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Limit::Limited(n) => write!(f, "{}", n),
            Limit::Unbounded => write!(f, "unlimited"),
        }
    }
}
