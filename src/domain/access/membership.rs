//! Membership - a non-exclusive access grant of a user on a tenant.
//!
//! Ownership of a tenant is carried by `Tenant::owner_id`; memberships are
//! additional grants and never transfer ownership.

use serde::{Deserialize, Serialize};

use super::{ActorRole, PlatformRole, TenantRole};
use crate::domain::foundation::{TenantId, Timestamp, UserId};

/// A user's role on one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub role: TenantRole,
    pub created_at: Timestamp,
}

impl Membership {
    pub fn new(user_id: UserId, tenant_id: TenantId, role: TenantRole) -> Self {
        Self {
            user_id,
            tenant_id,
            role,
            created_at: Timestamp::now(),
        }
    }
}

/// Picks the role an actor acts with on a tenant.
///
/// Platform admin and support outrank any tenant-scoped grant. A platform
/// viewer who also holds a membership acts through the membership, since
/// every tenant role is at least as capable as read-only platform access.
pub fn effective_actor_role(
    platform_role: Option<PlatformRole>,
    membership: Option<&Membership>,
) -> Option<ActorRole> {
    match (platform_role, membership) {
        (Some(PlatformRole::Admin), _) => Some(ActorRole::Platform(PlatformRole::Admin)),
        (Some(PlatformRole::Support), _) => Some(ActorRole::Platform(PlatformRole::Support)),
        (_, Some(m)) => Some(ActorRole::Tenant(m.role)),
        (Some(PlatformRole::Viewer), None) => Some(ActorRole::Platform(PlatformRole::Viewer)),
        (None, None) => None,
    }
}
