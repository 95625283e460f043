//! Subscription status state machine.
//!
//! Billing-side lifecycle of a tenant, independent of whether the physical
//! location is open.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Subscription status of a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Time-boxed evaluation. Location limit is the trial override.
    Trial,

    /// Paid and in good standing.
    Active,

    /// Payment failed, retries in progress.
    PastDue,

    /// Cancelled by the owner.
    Canceled,

    /// Trial or subscription ended.
    Expired,
}

impl SubscriptionStatus {
    pub fn is_trial(&self) -> bool {
        matches!(self, SubscriptionStatus::Trial)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "trial" => Some(SubscriptionStatus::Trial),
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "canceled" => Some(SubscriptionStatus::Canceled),
            "expired" => Some(SubscriptionStatus::Expired),
            _ => None,
        }
    }

    pub const ALL: [SubscriptionStatus; 5] = [
        SubscriptionStatus::Trial,
        SubscriptionStatus::Active,
        SubscriptionStatus::PastDue,
        SubscriptionStatus::Canceled,
        SubscriptionStatus::Expired,
    ];
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl StateMachine for SubscriptionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Trial => vec![Active, Canceled, Expired],
            Active => vec![PastDue, Canceled, Expired],
            PastDue => vec![Active, Canceled, Expired],
            Canceled => vec![Active, Expired],
            Expired => vec![Active],
        }
    }
}
