//! Membership reader port.
//!
//! Role lookups used to resolve the actor of a request. Tenant roles are
//! per membership row; platform roles are held per user.

use async_trait::async_trait;

use crate::domain::access::{Membership, PlatformRole};
use crate::domain::foundation::{DomainError, TenantId, UserId};

/// Reader port for memberships and platform roles.
#[async_trait]
pub trait MembershipReader: Send + Sync {
    /// The user's membership on a tenant, if any.
    async fn find_membership(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<Option<Membership>, DomainError>;

    /// The user's platform-scope role, if any.
    async fn platform_role(&self, user_id: &UserId) -> Result<Option<PlatformRole>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn MembershipReader) {}
    }
}
