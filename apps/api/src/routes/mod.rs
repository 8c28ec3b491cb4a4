pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::enhancement::handlers as enhancement;
use crate::render::handlers as render;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard session
        .route(
            "/api/v1/session",
            get(wizard::handle_get_session).delete(wizard::handle_reset),
        )
        .route("/api/v1/session/next", post(wizard::handle_next))
        .route("/api/v1/session/back", post(wizard::handle_back))
        .route("/api/v1/session/steps/:step", put(wizard::handle_update_step))
        .route(
            "/api/v1/session/personal/:field",
            put(wizard::handle_set_personal_field),
        )
        .route("/api/v1/session/entries/:kind", post(wizard::handle_add_entry))
        .route(
            "/api/v1/session/entries/:kind/:id",
            patch(wizard::handle_update_entry).delete(wizard::handle_remove_entry),
        )
        .route(
            "/api/v1/session/skills/:category",
            post(wizard::handle_add_skill).delete(wizard::handle_remove_skill),
        )
        // Text enhancement
        .route("/api/v1/session/improve", post(enhancement::handle_improve))
        // Layout and export
        .route("/api/v1/preview", get(render::handle_preview))
        .route("/api/v1/export", post(render::handle_export))
        .with_state(state)
}
