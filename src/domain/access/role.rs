//! Tenant-scoped and platform-scoped roles.
//!
//! Capability predicates live here so the lifecycle state machine and the
//! entitlement resolver ask the same question the same way.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Role a user holds on a single tenant through a membership row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantRole {
    Owner,
    Admin,
    Manager,
    Member,
    Viewer,
}

impl TenantRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantRole::Owner => "owner",
            TenantRole::Admin => "admin",
            TenantRole::Manager => "manager",
            TenantRole::Member => "member",
            TenantRole::Viewer => "viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "owner" => Some(TenantRole::Owner),
            "admin" => Some(TenantRole::Admin),
            "manager" => Some(TenantRole::Manager),
            "member" => Some(TenantRole::Member),
            "viewer" => Some(TenantRole::Viewer),
            _ => None,
        }
    }
}

/// Cross-tenant administrative capability level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlatformRole {
    #[serde(rename = "platform_admin")]
    Admin,
    #[serde(rename = "platform_support")]
    Support,
    #[serde(rename = "platform_viewer")]
    Viewer,
}

impl PlatformRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformRole::Admin => "platform_admin",
            PlatformRole::Support => "platform_support",
            PlatformRole::Viewer => "platform_viewer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "platform_admin" => Some(PlatformRole::Admin),
            "platform_support" => Some(PlatformRole::Support),
            "platform_viewer" => Some(PlatformRole::Viewer),
            _ => None,
        }
    }
}

/// The role an actor brings to a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "role", rename_all = "snake_case")]
pub enum ActorRole {
    Platform(PlatformRole),
    Tenant(TenantRole),
}

impl ActorRole {
    /// Whether this role may change a location's operational status.
    pub fn can_change_status(&self) -> bool {
        matches!(
            self,
            ActorRole::Platform(PlatformRole::Admin)
                | ActorRole::Platform(PlatformRole::Support)
                | ActorRole::Tenant(TenantRole::Owner)
                | ActorRole::Tenant(TenantRole::Admin)
        )
    }

    /// Whether this role may read the tenant's status history.
    ///
    /// Entries carry closure reasons and actor ids, so tenant members and
    /// viewers are excluded. Every platform role may read.
    pub fn can_view_history(&self) -> bool {
        matches!(
            self,
            ActorRole::Platform(_)
                | ActorRole::Tenant(TenantRole::Owner)
                | ActorRole::Tenant(TenantRole::Admin)
                | ActorRole::Tenant(TenantRole::Manager)
        )
    }

    pub fn platform_role(&self) -> Option<PlatformRole> {
        match self {
            ActorRole::Platform(role) => Some(*role),
            ActorRole::Tenant(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Platform(role) => role.as_str(),
            ActorRole::Tenant(role) => role.as_str(),
        }
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who is performing an operation and in what capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(user_id: UserId, role: ActorRole) -> Self {
        Self { user_id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owners_and_admins_can_change_status() {
        assert!(ActorRole::Tenant(TenantRole::Owner).can_change_status());
        assert!(ActorRole::Tenant(TenantRole::Admin).can_change_status());
    }

    #[test]
    fn lesser_tenant_roles_cannot_change_status() {
        for role in [TenantRole::Manager, TenantRole::Member, TenantRole::Viewer] {
            assert!(!ActorRole::Tenant(role).can_change_status(), "{:?}", role);
        }
    }

    #[test]
    fn platform_viewer_is_read_only() {
        assert!(!ActorRole::Platform(PlatformRole::Viewer).can_change_status());
        assert!(ActorRole::Platform(PlatformRole::Viewer).can_view_history());
    }

    #[test]
    fn history_is_hidden_from_members_and_tenant_viewers() {
        assert!(ActorRole::Tenant(TenantRole::Manager).can_view_history());
        assert!(ActorRole::Tenant(TenantRole::Owner).can_view_history());
        assert!(!ActorRole::Tenant(TenantRole::Member).can_view_history());
        assert!(!ActorRole::Tenant(TenantRole::Viewer).can_view_history());
    }

    #[test]
    fn platform_admin_and_support_can_change_status() {
        assert!(ActorRole::Platform(PlatformRole::Admin).can_change_status());
        assert!(ActorRole::Platform(PlatformRole::Support).can_change_status());
    }

    #[test]
    fn role_strings_parse_back() {
        for role in [
            TenantRole::Owner,
            TenantRole::Admin,
            TenantRole::Manager,
            TenantRole::Member,
            TenantRole::Viewer,
        ] {
            assert_eq!(TenantRole::parse(role.as_str()), Some(role));
        }
        for role in [PlatformRole::Admin, PlatformRole::Support, PlatformRole::Viewer] {
            assert_eq!(PlatformRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(TenantRole::parse("superuser"), None);
    }

    #[test]
    fn platform_role_serializes_with_prefix() {
        let json = serde_json::to_string(&PlatformRole::Support).unwrap();
        assert_eq!(json, "\"platform_support\"");
    }
}
