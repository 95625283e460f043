//! Lazy trial expiration.
//!
//! Runs on every tenant read. The transform is pure; persisting the result
//! is the read path's job.

use serde::Serialize;
use std::sync::Arc;

use super::{SubscriptionStatus, Tenant};
use crate::domain::entitlement::{EntitlementTable, TierKey};
use crate::domain::foundation::Timestamp;

/// What reconciliation did to a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrialReconciliation {
    /// Nothing to write back.
    Unchanged,
    /// Trial tenant without a window got one.
    Backfilled { trial_ends_at: Timestamp },
    /// Trial window elapsed. `downgraded_from` is set when the tier was
    /// reset to the baseline.
    Expired { downgraded_from: Option<TierKey> },
}

impl TrialReconciliation {
    pub fn is_changed(&self) -> bool {
        !matches!(self, TrialReconciliation::Unchanged)
    }
}

/// Applies the trial backfill and expiry rules.
#[derive(Debug, Clone)]
pub struct TrialExpirationEvaluator {
    table: Arc<EntitlementTable>,
}

impl TrialExpirationEvaluator {
    pub fn new(table: Arc<EntitlementTable>) -> Self {
        Self { table }
    }

    /// Reconcile a tenant's trial state at `now`.
    ///
    /// - trial without `trial_ends_at`: backfill `now + duration`
    /// - trial with `trial_ends_at < now`: expire and clear the window; reset
    ///   the tier to the baseline unless a paid subscription is attached
    /// - anything else: unchanged
    pub fn reconcile(&self, mut tenant: Tenant, now: Timestamp) -> (Tenant, TrialReconciliation) {
        if tenant.subscription_status != SubscriptionStatus::Trial {
            return (tenant, TrialReconciliation::Unchanged);
        }

        match tenant.trial_ends_at {
            None => {
                let ends = now.add_days(i64::from(self.table.trial().duration_days));
                tenant.trial_ends_at = Some(ends);
                tenant.updated_at = now;
                (tenant, TrialReconciliation::Backfilled { trial_ends_at: ends })
            }
            Some(ends) if ends.is_before(&now) => {
                tenant.subscription_status = SubscriptionStatus::Expired;
                tenant.trial_ends_at = None;
                tenant.updated_at = now;

                let baseline = self.table.baseline_tier();
                let keeps_tier = tenant.has_paid_subscription() || tenant.tier == baseline.key;
                let downgraded_from = if keeps_tier {
                    None
                } else {
                    // The quota copied from the trial tier goes with it
                    tenant.sku_quota = baseline.max_skus.value();
                    Some(std::mem::replace(&mut tenant.tier, baseline.key.clone()))
                };
                (tenant, TrialReconciliation::Expired { downgraded_from })
            }
            Some(_) => (tenant, TrialReconciliation::Unchanged),
        }
    }
}
