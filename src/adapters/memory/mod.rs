//! In-memory adapters for tests and local wiring.

mod directory_client;
mod membership_reader;
mod status_history_store;
mod tenant_repository;

pub use directory_client::{DisabledDirectoryClient, RecordingDirectoryClient, ScriptedSync};
pub use membership_reader::InMemoryMembershipReader;
pub use status_history_store::InMemoryStatusHistoryStore;
pub use tenant_repository::InMemoryTenantRepository;
