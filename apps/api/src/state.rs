use std::sync::Arc;

use crate::applications::store::ApplicationStore;
use crate::config::Config;
use crate::import::coordinator::ImportCoordinator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable store. PostgreSQL when `DATABASE_URL` is set, in-memory otherwise.
    pub store: Arc<dyn ApplicationStore>,
    /// Shares `store`; owns the per-user "import running" guard.
    pub importer: ImportCoordinator,
    pub config: Config,
}
