//! In-memory MembershipReader.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::access::{Membership, PlatformRole};
use crate::domain::foundation::{DomainError, TenantId, UserId};
use crate::ports::MembershipReader;

#[derive(Default)]
pub struct InMemoryMembershipReader {
    memberships: RwLock<HashMap<(UserId, TenantId), Membership>>,
    platform_roles: RwLock<HashMap<UserId, PlatformRole>>,
}

impl InMemoryMembershipReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn grant(&self, membership: Membership) {
        self.memberships
            .write()
            .await
            .insert((membership.user_id.clone(), membership.tenant_id), membership);
    }

    pub async fn grant_platform_role(&self, user_id: UserId, role: PlatformRole) {
        self.platform_roles.write().await.insert(user_id, role);
    }
}

#[async_trait]
impl MembershipReader for InMemoryMembershipReader {
    async fn find_membership(
        &self,
        user_id: &UserId,
        tenant_id: &TenantId,
    ) -> Result<Option<Membership>, DomainError> {
        Ok(self
            .memberships
            .read()
            .await
            .get(&(user_id.clone(), *tenant_id))
            .cloned())
    }

    async fn platform_role(&self, user_id: &UserId) -> Result<Option<PlatformRole>, DomainError> {
        Ok(self.platform_roles.read().await.get(user_id).copied())
    }
}
