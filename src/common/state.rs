// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::common::config::Config;
use crate::services::OidcService;

/// Application state containing the database pool, configuration, and the
/// discovered OIDC client. Built once at startup and shared read-only via
/// `Extension<Arc<AppState>>`.
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub oidc: Arc<OidcService>,
}
