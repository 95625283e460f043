//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod access;
pub mod entitlement;
pub mod lifecycle;
pub mod tenant;

pub use access::{ResolveActorHandler, ResolveActorQuery, ResolveActorResult};
pub use entitlement::{
    CheckLocationCreationHandler, CheckLocationCreationQuery, CreateTenantCommand,
    CreateTenantHandler, CreateTenantResult, CreationCheck, CreationGovernedBy,
    GetEffectiveEntitlementsHandler, GetEffectiveEntitlementsQuery, GetEffectiveEntitlementsResult,
};
pub use lifecycle::{
    ChangeStatusCommand, ChangeStatusHandler, DirectorySyncCoordinator, GetStatusHistoryHandler,
    GetStatusHistoryQuery, GetStatusHistoryResult, HistoryRecorder, JobOutcome,
    PreviewStatusChangeHandler, PreviewStatusChangeQuery, PreviewStatusChangeResult,
    RecordOutcome, SideEffectError, SideEffectWorker, SideEffectWorkerConfig, StatusChangeOutcome,
    SyncOutcome,
};
pub use tenant::{GetTenantHandler, GetTenantQuery, GetTenantResult, TrialReconciler};
