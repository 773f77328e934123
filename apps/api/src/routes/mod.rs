pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::import::handlers as import;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let import_limit = state.config.import_max_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications),
        )
        .route(
            "/api/v1/applications/export",
            get(applications::handle_export_csv),
        )
        .route(
            "/api/v1/applications/import",
            post(import::handle_import).layer(DefaultBodyLimit::max(import_limit)),
        )
        .with_state(state)
}
