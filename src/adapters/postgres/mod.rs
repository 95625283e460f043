//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresTenantRepository` - tenant rows and the atomic status update
//! - `PostgresStatusHistoryStore` - append-only history, availability probed
//! - `PostgresTierCatalogReader` - seeded tier and feature rows
//! - `PostgresMembershipReader` - tenant memberships and platform roles

mod membership_reader;
mod status_history_store;
mod tenant_repository;
mod tier_catalog_reader;

pub use membership_reader::PostgresMembershipReader;
pub use status_history_store::PostgresStatusHistoryStore;
pub use tenant_repository::PostgresTenantRepository;
pub use tier_catalog_reader::PostgresTierCatalogReader;
