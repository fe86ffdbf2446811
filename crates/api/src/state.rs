use std::sync::Arc;

use crate::auth::verifier::CredentialVerifier;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Constructed exactly once in the entrypoint and cloned per request
/// (inner data is behind `Arc`). There is no module-level global state;
/// everything a handler needs is injected here.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: matchday_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External credential verifier (identity-provider bridge).
    pub verifier: Arc<dyn CredentialVerifier>,
}
