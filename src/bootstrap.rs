//! Composition root.
//!
//! Turns a validated [`AppConfig`] into a ready set of handlers plus the
//! side-effect worker that drains their queue. Postgres adapters are used
//! when a database section is present, in-memory adapters otherwise; the
//! directory client is disabled when no directory section is configured.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::adapters::{
    DisabledDirectoryClient, HttpDirectoryClient, InMemoryMembershipReader, InMemoryStatusHistoryStore,
    InMemoryTenantRepository, PostgresMembershipReader, PostgresStatusHistoryStore, PostgresTenantRepository,
    PostgresTierCatalogReader, SideEffectQueue,
};
use crate::application::handlers::access::ResolveActorHandler;
use crate::application::handlers::entitlement::{
    CheckLocationCreationHandler, CreateTenantHandler, GetEffectiveEntitlementsHandler,
};
use crate::application::handlers::lifecycle::{
    ChangeStatusHandler, DirectorySyncCoordinator, GetStatusHistoryHandler, HistoryRecorder,
    PreviewStatusChangeHandler, SideEffectWorker,
};
use crate::application::handlers::tenant::{GetTenantHandler, TrialReconciler};
use crate::config::{AppConfig, ConfigError, DatabaseConfig, ValidationError};
use crate::domain::entitlement::{EntitlementResolver, EntitlementTable};
use crate::domain::foundation::DomainError;
use crate::domain::tenant::{DefaultTransitionPolicy, LifecycleStateMachine, TrialExpirationEvaluator};
use crate::ports::{
    DirectorySyncClient, MembershipReader, SideEffectDispatcher, StatusHistoryStore, TenantRepository,
    TierCatalogReader,
};

/// Errors raised while assembling the application.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database unavailable: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Domain(#[from] DomainError),
}

/// Port implementations chosen for this process.
#[derive(Clone)]
pub struct Adapters {
    pub tenants: Arc<dyn TenantRepository>,
    pub memberships: Arc<dyn MembershipReader>,
    pub history: Arc<dyn StatusHistoryStore>,
    pub directory: Arc<dyn DirectorySyncClient>,
}

impl Adapters {
    /// All in-memory, directory sync disabled.
    pub fn in_memory() -> Self {
        Self {
            tenants: Arc::new(InMemoryTenantRepository::new()),
            memberships: Arc::new(InMemoryMembershipReader::new()),
            history: Arc::new(InMemoryStatusHistoryStore::new()),
            directory: Arc::new(DisabledDirectoryClient),
        }
    }

    fn postgres(pool: &PgPool) -> Self {
        Self {
            tenants: Arc::new(PostgresTenantRepository::new(pool.clone())),
            memberships: Arc::new(PostgresMembershipReader::new(pool.clone())),
            history: Arc::new(PostgresStatusHistoryStore::new(pool.clone())),
            directory: Arc::new(DisabledDirectoryClient),
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn DirectorySyncClient>) -> Self {
        self.directory = directory;
        self
    }
}

/// Every exposed handler, sharing one table, one reconciler and one queue.
#[derive(Clone)]
pub struct Storeplex {
    pub table: Arc<EntitlementTable>,
    pub get_tenant: Arc<GetTenantHandler>,
    pub resolve_actor: Arc<ResolveActorHandler>,
    pub get_effective_entitlements: Arc<GetEffectiveEntitlementsHandler>,
    pub check_location_creation: Arc<CheckLocationCreationHandler>,
    pub create_tenant: Arc<CreateTenantHandler>,
    pub change_status: Arc<ChangeStatusHandler>,
    pub preview_status_change: Arc<PreviewStatusChangeHandler>,
    pub get_status_history: Arc<GetStatusHistoryHandler>,
}

impl Storeplex {
    /// Wire handlers over the given adapters.
    ///
    /// The returned worker must be spawned for history and directory jobs
    /// to run; until then they accumulate in the queue up to its capacity.
    pub fn assemble(
        config: &AppConfig,
        table: EntitlementTable,
        adapters: Adapters,
    ) -> (Self, SideEffectWorker) {
        let table = Arc::new(table);
        let Adapters {
            tenants,
            memberships,
            history,
            directory,
        } = adapters;

        let (queue, receiver) = SideEffectQueue::bounded(config.side_effects.queue_capacity);
        let dispatcher: Arc<dyn SideEffectDispatcher> = Arc::new(queue);
        let worker = SideEffectWorker::new(
            receiver,
            HistoryRecorder::new(history.clone()),
            DirectorySyncCoordinator::new(directory),
            config.side_effects.worker_config(),
        );

        let reconciler = Arc::new(TrialReconciler::new(
            tenants.clone(),
            TrialExpirationEvaluator::new(table.clone()),
        ));
        let state_machine = LifecycleStateMachine::new(Arc::new(DefaultTransitionPolicy));
        let resolver = EntitlementResolver::new(table.clone());

        let check_location_creation = Arc::new(CheckLocationCreationHandler::new(
            tenants.clone(),
            reconciler.clone(),
            resolver.clone(),
        ));

        let app = Self {
            get_tenant: Arc::new(GetTenantHandler::new(reconciler.clone())),
            resolve_actor: Arc::new(ResolveActorHandler::new(tenants.clone(), memberships)),
            get_effective_entitlements: Arc::new(GetEffectiveEntitlementsHandler::new(
                reconciler.clone(),
                resolver,
            )),
            create_tenant: Arc::new(CreateTenantHandler::new(
                tenants.clone(),
                table.clone(),
                check_location_creation.clone(),
            )),
            check_location_creation,
            change_status: Arc::new(ChangeStatusHandler::new(
                tenants,
                reconciler.clone(),
                state_machine.clone(),
                dispatcher,
            )),
            preview_status_change: Arc::new(PreviewStatusChangeHandler::new(
                reconciler.clone(),
                state_machine,
            )),
            get_status_history: Arc::new(GetStatusHistoryHandler::new(reconciler, history)),
            table,
        };

        (app, worker)
    }

    /// Validate the configuration, open the configured backends and wire
    /// everything.
    pub async fn build(config: &AppConfig) -> Result<(Self, SideEffectWorker), BootstrapError> {
        config.validate()?;

        let pool = match &config.database {
            Some(database) => Some(connect(database).await?),
            None => {
                tracing::info!("No database configured, using in-memory adapters");
                None
            }
        };

        let table = match (&pool, &config.database) {
            (Some(pool), Some(database)) if database.load_tiers_from_database => {
                let tiers = PostgresTierCatalogReader::new(pool.clone()).load_tiers().await?;
                tracing::info!(tiers = tiers.len(), "Tier catalog loaded from database");
                config.entitlements.build_table_with(tiers)?
            }
            _ => config.entitlements.build_table()?,
        };

        let mut adapters = match &pool {
            Some(pool) => Adapters::postgres(pool),
            None => Adapters::in_memory(),
        };

        match &config.directory {
            Some(directory) => {
                let client = HttpDirectoryClient::new(directory.client_config())?;
                tracing::info!(base_url = %directory.base_url, "Directory sync enabled");
                adapters = adapters.with_directory(Arc::new(client));
            }
            None => tracing::info!("No directory configured, status changes will not be mirrored"),
        }

        Ok(Self::assemble(config, table, adapters))
    }
}

async fn connect(database: &DatabaseConfig) -> Result<PgPool, BootstrapError> {
    tracing::info!(max_connections = database.max_connections, "Connecting to database");
    let pool = database.connect().await?;
    if database.run_migrations {
        tracing::info!("Database migrations applied");
    }
    Ok(pool)
}
