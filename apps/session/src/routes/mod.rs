pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route(
            "/api/v1/session",
            get(handlers::handle_mount)
                .put(handlers::handle_replace_snapshot)
                .delete(handlers::handle_reset),
        )
        .route("/api/v1/session/current", get(handlers::handle_current))
        .route(
            "/api/v1/session/tailored",
            post(handlers::handle_record_tailoring),
        )
        .route(
            "/api/v1/session/sections/:section",
            patch(handlers::handle_edit_section),
        )
        .route(
            "/api/v1/session/error",
            delete(handlers::handle_dismiss_error),
        )
        .route(
            "/api/v1/session/analysis",
            post(handlers::handle_analysis),
        )
        // Onboarding flag
        .route(
            "/api/v1/onboarding",
            get(handlers::handle_get_onboarding).put(handlers::handle_set_onboarding),
        )
        .with_state(state)
}
