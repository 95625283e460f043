//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Lifecycle
    ChangeStatusCommand, ChangeStatusHandler, StatusChangeOutcome,
    PreviewStatusChangeHandler, PreviewStatusChangeQuery,
    GetStatusHistoryHandler, GetStatusHistoryQuery,
    SideEffectWorker, SideEffectWorkerConfig,
    // Entitlements
    GetEffectiveEntitlementsHandler, GetEffectiveEntitlementsQuery,
    CheckLocationCreationHandler, CheckLocationCreationQuery,
    CreateTenantCommand, CreateTenantHandler,
    // Tenant / access
    GetTenantHandler, GetTenantQuery, TrialReconciler,
    ResolveActorHandler, ResolveActorQuery,
};
