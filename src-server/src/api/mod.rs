//! API Routes
//!
//! JSON endpoints over the actions layer.

mod error;
mod events;
mod extract;
mod handlers;


use axum::{
    routing::{get, patch, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use error::ApiError;

/// Create API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Board columns
        .route("/api/columns", get(handlers::list_columns).post(handlers::create_column))
        .route(
            "/api/columns/:id",
            patch(handlers::update_column).delete(handlers::delete_column),
        )
        // Leads
        .route("/api/leads", get(handlers::list_leads).post(handlers::create_lead))
        .route(
            "/api/leads/:id",
            patch(handlers::update_lead).delete(handlers::delete_lead),
        )
        .route("/api/leads/:id/status", put(handlers::update_lead_status))
        .route("/api/pipeline/summary", get(handlers::pipeline_summary))
        // Settings
        .route("/api/settings", get(handlers::get_settings).put(handlers::update_settings))
        // Stale-view notifications
        .route("/api/events", get(events::stream_invalidations))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
