//! Access handlers.
//!
//! ## Queries
//! - Resolve the acting role of a user on a tenant

mod resolve_actor;

pub use resolve_actor::{ResolveActorHandler, ResolveActorQuery, ResolveActorResult};
