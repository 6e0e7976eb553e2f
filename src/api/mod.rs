//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;


use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/countdown/start", post(start_handler))
        .route("/countdown/stop", post(stop_handler))
        .route("/countdown/settings", post(settings_handler))
        .route("/countdown/status", get(status_handler))
        .route("/countdown/events", get(events_handler))
        .route(
            "/preferences",
            get(get_preferences_handler).put(update_preferences_handler),
        )
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
