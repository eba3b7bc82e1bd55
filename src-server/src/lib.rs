//! CRM Pipeline Backend
//!
//! Layered architecture:
//! - domain: Core entities and pipeline rules
//! - repository: SQLite data access
//! - actions: Server actions invoked by the dashboard
//! - api: HTTP routes over the actions
//! - context / invalidation: per-request tenant and stale-view signal

use std::sync::Arc;

pub mod config;
pub mod context;
pub mod domain;
pub mod invalidation;
pub mod repository;
pub mod actions;
pub mod api;

use config::{Config, IdentityConfig};
use context::OrgResolver;
use invalidation::InvalidationBus;
use repository::{init_db, ColumnRepository, DbState, LeadRepository, SettingsRepository};

/// Application state shared across requests
pub struct AppState {
    pub columns: ColumnRepository,
    pub leads: LeadRepository,
    pub settings: SettingsRepository,
    pub invalidation: InvalidationBus,
    pub org_resolver: OrgResolver,
}

impl AppState {
    pub fn new(db_state: DbState, identity: &IdentityConfig) -> Self {
        Self {
            columns: ColumnRepository::new(db_state.shared()),
            leads: LeadRepository::new(db_state.shared()),
            settings: SettingsRepository::new(db_state.shared()),
            invalidation: InvalidationBus::default(),
            org_resolver: OrgResolver::from_config(identity),
        }
    }
}

/// Open the database and serve the API until Ctrl-C
pub async fn run(config: Config) -> anyhow::Result<()> {
    let db_state = init_db(&config.database.path).await?;
    let state = Arc::new(AppState::new(db_state, &config.identity));
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr).await?;
    log::info!("CRM pipeline listening on {}", listener.local_addr()?);
    let _ = rolling_logger::info("Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
}
