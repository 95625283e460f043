//! Access domain module.
//!
//! Roles, actors and membership grants used to gate lifecycle operations
//! and platform-initiated location creation.

mod membership;
mod role;

pub use membership::{effective_actor_role, Membership};
pub use role::{Actor, ActorRole, PlatformRole, TenantRole};
