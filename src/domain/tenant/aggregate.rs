//! Tenant aggregate entity.
//!
//! A tenant is one managed retail location together with its subscription
//! state. The owner holds it exclusively; memberships only add access.
//!
//! # Design Decisions
//!
//! - **Two independent lifecycles**: `subscription_status` (billing) and
//!   `location_status` (operations) never drive each other
//! - **Trial window lives on the row**: `trial_ends_at` is present exactly
//!   while the tenant is on trial
//! - **Status writes are single-row**: a [`LocationStatusChange`] carries every
//!   column the atomic update touches

use serde::{Deserialize, Serialize};

use super::{LocationStatus, SubscriptionStatus};
use crate::domain::access::PlatformRole;
use crate::domain::entitlement::{TierDefinition, TierKey, TrialOverride};
use crate::domain::foundation::{OrganizationId, TenantId, Timestamp, UserId, ValidationError};

/// Who created the tenant row.
///
/// Platform-support creations count against a per-owner cap, so the
/// provisioner is persisted rather than inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provisioner {
    /// The owner created it through self-service.
    Owner,
    /// A platform operator created it on the owner's behalf.
    Platform(PlatformRole),
}

impl Provisioner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provisioner::Owner => "owner",
            Provisioner::Platform(role) => role.as_str(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(Provisioner::Owner),
            other => PlatformRole::parse(other).map(Provisioner::Platform),
        }
    }
}

/// Tenant aggregate.
///
/// # Invariants
///
/// - `trial_ends_at.is_some()` iff `subscription_status == Trial`
///   (legacy rows are repaired by the trial evaluator on read)
/// - `reopening_date` is only set while `location_status == Closed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub owner_id: UserId,
    pub organization_id: Option<OrganizationId>,
    pub name: String,

    pub tier: TierKey,
    pub subscription_status: SubscriptionStatus,
    pub trial_ends_at: Option<Timestamp>,
    /// Reference to a paid subscription held outside the tier column.
    pub external_subscription_ref: Option<String>,

    pub location_status: LocationStatus,
    pub status_changed_at: Option<Timestamp>,
    pub status_changed_by: Option<UserId>,
    pub reopening_date: Option<Timestamp>,
    pub closure_reason: Option<String>,

    /// Per-tenant SKU quota. `None` defers to the tier's quota hint.
    pub sku_quota: Option<u32>,
    pub skus_used_this_period: u32,

    pub provisioned_by: Provisioner,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Tenant {
    /// Create a new tenant entering its trial window.
    ///
    /// New locations start `Pending` and copy the tier's SKU quota hint.
    ///
    /// # Errors
    ///
    /// Returns `EmptyField` if the name is blank.
    pub fn start_trial(
        owner_id: UserId,
        organization_id: Option<OrganizationId>,
        name: impl Into<String>,
        tier: &TierDefinition,
        trial: &TrialOverride,
        provisioned_by: Provisioner,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            id: TenantId::new(),
            owner_id,
            organization_id,
            name: name.trim().to_string(),
            tier: tier.key.clone(),
            subscription_status: SubscriptionStatus::Trial,
            trial_ends_at: Some(now.add_days(i64::from(trial.duration_days))),
            external_subscription_ref: None,
            location_status: LocationStatus::Pending,
            status_changed_at: None,
            status_changed_by: None,
            reopening_date: None,
            closure_reason: None,
            sku_quota: tier.max_skus.value(),
            skus_used_this_period: 0,
            provisioned_by,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_on_trial(&self) -> bool {
        self.subscription_status.is_trial()
    }

    /// A paid subscription exists independently of the tier column.
    pub fn has_paid_subscription(&self) -> bool {
        self.external_subscription_ref
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }

    /// Whether `trial_ends_at` agrees with `subscription_status`.
    pub fn trial_window_consistent(&self) -> bool {
        self.is_on_trial() == self.trial_ends_at.is_some()
    }
}

/// Every column the atomic status update writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationStatusChange {
    pub tenant_id: TenantId,
    /// Status the change was validated against.
    pub from: LocationStatus,
    pub to: LocationStatus,
    pub changed_by: UserId,
    pub changed_at: Timestamp,
    pub reason: Option<String>,
    pub reopening_date: Option<Timestamp>,
}

impl LocationStatusChange {
    /// Closure reason stored on the row.
    ///
    /// Moving back to `Active` clears the previous closure.
    pub fn closure_reason(&self) -> Option<&str> {
        match self.to {
            LocationStatus::Active => None,
            _ => self.reason.as_deref(),
        }
    }

    /// Reopening date stored on the row; only kept while closed.
    pub fn stored_reopening_date(&self) -> Option<Timestamp> {
        match self.to {
            LocationStatus::Closed => self.reopening_date,
            _ => None,
        }
    }

    /// Write this change onto an in-memory tenant.
    pub fn apply_to(&self, tenant: &mut Tenant) {
        tenant.location_status = self.to;
        tenant.status_changed_at = Some(self.changed_at);
        tenant.status_changed_by = Some(self.changed_by.clone());
        tenant.reopening_date = self.stored_reopening_date();
        tenant.closure_reason = self.closure_reason().map(str::to_string);
        tenant.updated_at = self.changed_at;
    }
}
