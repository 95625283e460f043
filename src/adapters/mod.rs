//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `postgres` - sqlx-backed repositories and readers
//! - `directory` - HTTP client for the external listing service
//! - `side_effects` - bounded queue feeding the side-effect worker
//! - `memory` - in-process implementations for tests and local wiring

pub mod directory;
pub mod memory;
pub mod postgres;
pub mod side_effects;

pub use directory::{DirectoryClientConfig, HttpDirectoryClient};
pub use memory::{
    DisabledDirectoryClient, InMemoryMembershipReader, InMemoryStatusHistoryStore, InMemoryTenantRepository,
    RecordingDirectoryClient, ScriptedSync,
};
pub use postgres::{
    PostgresMembershipReader, PostgresStatusHistoryStore, PostgresTenantRepository,
    PostgresTierCatalogReader,
};
pub use side_effects::SideEffectQueue;
