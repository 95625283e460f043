//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Store Ports
//!
//! - `TenantRepository` - Tenant rows, atomic status update, owner counts
//! - `TierCatalogReader` - Tier and feature rows
//! - `MembershipReader` - Tenant and platform role lookup
//! - `StatusHistoryStore` - Append-only history with explicit availability
//!
//! ## Outbound Ports
//!
//! - `DirectorySyncClient` - External listing service
//! - `SideEffectDispatcher` - Non-blocking post-commit work submission

mod directory_sync_client;
mod membership_reader;
mod side_effect_dispatcher;
mod status_history_store;
mod tenant_repository;
mod tier_catalog_reader;

pub use directory_sync_client::{DirectorySyncClient, DirectorySyncRequest, SyncResponse};
pub use membership_reader::MembershipReader;
pub use side_effect_dispatcher::{DispatchError, SideEffectDispatcher, SideEffectJob};
pub use status_history_store::{HistoryAvailability, StatusHistoryStore};
pub use tenant_repository::{StatusUpdateOutcome, TenantRepository};
pub use tier_catalog_reader::TierCatalogReader;
