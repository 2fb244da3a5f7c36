use crate::accounts::store::AccountStore;
use crate::config::Config;
use crate::sessions::issuer::SessionIssuer;

/// Shared application state injected into all route handlers via Axum extractors.
/// Store handles are owned here; nothing reaches into driver state directly.
#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountStore,
    pub sessions: SessionIssuer,
    pub config: Config,
}
