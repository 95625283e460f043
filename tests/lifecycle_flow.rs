//! Integration tests for the location lifecycle.
//!
//! These tests drive the assembled application end to end:
//! 1. A location is created on a trial and starts `pending`
//! 2. Status changes commit synchronously and enqueue side effects
//! 3. The side-effect worker records history and mirrors the directory
//! 4. History reads back newest first
//!
//! Uses in-memory adapters so no database or directory is required.

use std::sync::Arc;

use tokio::sync::watch;

use storeplex::adapters::{
    InMemoryMembershipReader, InMemoryStatusHistoryStore, InMemoryTenantRepository, RecordingDirectoryClient,
};
use storeplex::application::handlers::entitlement::{CheckLocationCreationQuery, CreateTenantCommand};
use storeplex::application::handlers::lifecycle::{
    ChangeStatusCommand, GetStatusHistoryQuery, PreviewStatusChangeQuery, StatusChangeOutcome,
};
use storeplex::bootstrap::{Adapters, Storeplex};
use storeplex::config::AppConfig;
use storeplex::domain::access::{Actor, ActorRole, PlatformRole, TenantRole};
use storeplex::domain::entitlement::Limit;
use storeplex::domain::foundation::{TenantId, Timestamp, UserId};
use storeplex::domain::tenant::{LocationStatus, RejectionReason, TenantError};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    app: Storeplex,
    history: Arc<InMemoryStatusHistoryStore>,
    directory: Arc<RecordingDirectoryClient>,
    worker: Option<storeplex::application::handlers::lifecycle::SideEffectWorker>,
}

impl Harness {
    fn new() -> Self {
        let config = AppConfig::default();
        let table = config.entitlements.build_table().expect("bundled catalog is valid");

        let history = Arc::new(InMemoryStatusHistoryStore::new());
        let directory = Arc::new(RecordingDirectoryClient::synced());
        let adapters = Adapters {
            tenants: Arc::new(InMemoryTenantRepository::new()),
            memberships: Arc::new(InMemoryMembershipReader::new()),
            history: history.clone(),
            directory: directory.clone(),
        };

        let (app, worker) = Storeplex::assemble(&config, table, adapters);
        Self {
            app,
            history,
            directory,
            worker: Some(worker),
        }
    }

    /// Run every queued side effect and stop the worker.
    async fn drain(&mut self) -> usize {
        let worker = self.worker.take().expect("worker already drained");
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(worker.run(shutdown_rx));
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap()
    }

    async fn create_location(&self, owner: &UserId, name: &str) -> TenantId {
        let tenant = self
            .app
            .create_tenant
            .handle(CreateTenantCommand {
                requested_by: owner.clone(),
                platform_role: None,
                owner_id: owner.clone(),
                organization_id: None,
                name: name.to_string(),
                tier: None,
            })
            .await
            .unwrap();
        tenant.id
    }

    async fn change(
        &self,
        tenant_id: TenantId,
        actor: &Actor,
        target: LocationStatus,
        reason: Option<&str>,
        reopening_date: Option<Timestamp>,
    ) -> Result<StatusChangeOutcome, TenantError> {
        self.app
            .change_status
            .handle(ChangeStatusCommand {
                tenant_id,
                actor: actor.clone(),
                target,
                reason: reason.map(str::to_string),
                reopening_date,
            })
            .await
    }
}

fn owner() -> UserId {
    UserId::new("owner-1").unwrap()
}

fn owner_actor() -> Actor {
    Actor::new(owner(), ActorRole::Tenant(TenantRole::Owner))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn new_location_starts_pending_on_trial() {
    let harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;

    let tenant = harness
        .app
        .get_tenant
        .handle(storeplex::application::handlers::tenant::GetTenantQuery { tenant_id })
        .await
        .unwrap();

    assert_eq!(tenant.location_status, LocationStatus::Pending);
    assert!(tenant.is_on_trial());
    assert!(tenant.trial_ends_at.is_some());
}

#[tokio::test]
async fn status_changes_flow_through_worker_to_history_and_directory() {
    let mut harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;
    let actor = owner_actor();
    let reopen = Timestamp::now().add_days(7);

    let activated = harness
        .change(tenant_id, &actor, LocationStatus::Active, None, None)
        .await
        .unwrap();
    assert!(!activated.is_no_op());

    let closed = harness
        .change(tenant_id, &actor, LocationStatus::Closed, Some("  Renovation  "), Some(reopen))
        .await
        .unwrap();
    assert_eq!(closed.tenant().location_status, LocationStatus::Closed);
    assert_eq!(closed.tenant().closure_reason.as_deref(), Some("Renovation"));

    // Two changes, each submitting a history and a directory job
    let processed = harness.drain().await;
    assert_eq!(processed, 4);

    let entries = harness.history.entries().await;
    assert_eq!(entries.len(), 2);

    let calls = harness.directory.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].status, LocationStatus::Closed);
    assert_eq!(calls[1].reopening_date, Some(reopen));

    let history = harness
        .app
        .get_status_history
        .handle(GetStatusHistoryQuery {
            tenant_id,
            actor,
            limit: 10,
        })
        .await
        .unwrap();
    assert!(history.history_available);
    assert_eq!(history.entries.len(), 2);
    assert_eq!(history.entries[0].new_status, LocationStatus::Closed);
    assert_eq!(history.entries[0].reason.as_deref(), Some("Renovation"));
    assert_eq!(history.entries[1].old_status, LocationStatus::Pending);
}

#[tokio::test]
async fn rejected_change_enqueues_nothing() {
    let mut harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;
    let actor = owner_actor();
    harness
        .change(tenant_id, &actor, LocationStatus::Active, None, None)
        .await
        .unwrap();

    let err = harness
        .change(tenant_id, &actor, LocationStatus::Closed, Some("   "), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TenantError::InvalidTransition {
            rejection: RejectionReason::ReasonRequired { .. },
            ..
        }
    ));
    // Only the activation produced side effects
    assert_eq!(harness.drain().await, 2);
    assert_eq!(harness.history.entries().await.len(), 1);
}

#[tokio::test]
async fn same_status_is_a_no_op_without_side_effects() {
    let mut harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;

    let outcome = harness
        .change(tenant_id, &owner_actor(), LocationStatus::Pending, None, None)
        .await
        .unwrap();

    assert!(outcome.is_no_op());
    assert_eq!(harness.drain().await, 0);
    assert!(harness.directory.calls().await.is_empty());
}

#[tokio::test]
async fn preview_reports_refusal_without_writing() {
    let mut harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;

    let preview = harness
        .app
        .preview_status_change
        .handle(PreviewStatusChangeQuery {
            tenant_id,
            actor: owner_actor(),
            target: LocationStatus::Closed,
        })
        .await
        .unwrap();

    assert!(!preview.valid);
    assert!(matches!(preview.rejection, Some(RejectionReason::NotAllowed { .. })));
    assert_eq!(harness.drain().await, 0);
}

#[tokio::test]
async fn trial_owner_cannot_open_a_second_location() {
    let harness = Harness::new();
    harness.create_location(&owner(), "Corner Books").await;

    let check = harness
        .app
        .check_location_creation
        .handle(CheckLocationCreationQuery {
            requested_by: owner(),
            platform_role: None,
            owner_id: owner(),
        })
        .await
        .unwrap();
    assert!(!check.allowed);
    assert_eq!(check.remaining, Limit::Limited(0));

    let err = harness
        .app
        .create_tenant
        .handle(CreateTenantCommand {
            requested_by: owner(),
            platform_role: None,
            owner_id: owner(),
            organization_id: None,
            name: "Second Shop".to_string(),
            tier: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TenantError::LimitReached { .. }));
}

#[tokio::test]
async fn platform_viewer_cannot_change_status() {
    let harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;
    let viewer = Actor::new(
        UserId::new("support-viewer").unwrap(),
        ActorRole::Platform(PlatformRole::Viewer),
    );

    let err = harness
        .change(tenant_id, &viewer, LocationStatus::Active, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, TenantError::Forbidden { .. }));
}

#[tokio::test]
async fn tenant_member_cannot_read_history() {
    let harness = Harness::new();
    let tenant_id = harness.create_location(&owner(), "Corner Books").await;
    let member = Actor::new(UserId::new("clerk-1").unwrap(), ActorRole::Tenant(TenantRole::Member));

    let err = harness
        .app
        .get_status_history
        .handle(GetStatusHistoryQuery {
            tenant_id,
            actor: member,
            limit: 10,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TenantError::Forbidden { .. }));
}
