pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::session::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/dashboard", get(handlers::handle_dashboard))
        // Jobs + generation lifecycle
        .route("/api/v1/jobs", get(handlers::handle_get_jobs))
        .route("/api/v1/jobs/reload", post(handlers::handle_reload_jobs))
        .route("/api/v1/jobs/:id/generate", post(handlers::handle_generate))
        .route(
            "/api/v1/jobs/:id/generation",
            get(handlers::handle_get_generation),
        )
        // Resumes + selection
        .route("/api/v1/resumes", get(handlers::handle_get_resumes))
        .route(
            "/api/v1/resumes/reload",
            post(handlers::handle_reload_resumes),
        )
        .route(
            "/api/v1/resumes/selection",
            put(handlers::handle_select_resume),
        )
        // Applications: expansion, detail cache, documents
        .route(
            "/api/v1/applications",
            get(handlers::handle_get_applications),
        )
        .route(
            "/api/v1/applications/reload",
            post(handlers::handle_reload_applications),
        )
        .route(
            "/api/v1/applications/:id",
            get(handlers::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/toggle",
            post(handlers::handle_toggle_application),
        )
        .route(
            "/api/v1/applications/:id/document",
            get(handlers::handle_get_document),
        )
        .route(
            "/api/v1/applications/:id/document/rendered",
            get(handlers::handle_get_rendered_document),
        )
        .route("/api/v1/cache", get(handlers::handle_get_cache))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        .with_state(state)
}
