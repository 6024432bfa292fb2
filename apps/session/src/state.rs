use std::sync::Arc;

use tokio::sync::Mutex;

use crate::backend::TailorBackend;
use crate::config::Config;
use crate::session::Workspace;
use crate::storage::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Tailoring REST API. `HttpBackend` in production.
    pub backend: Arc<dyn TailorBackend>,
    /// The single page workspace. One user, one session at a time.
    pub workspace: Arc<Mutex<Workspace>>,
    pub store: SessionStore,
    pub config: Config,
}

impl AppState {
    pub fn new(backend: Arc<dyn TailorBackend>, store: SessionStore, config: Config) -> Self {
        Self {
            backend,
            workspace: Arc::new(Mutex::new(Workspace::new(store.clone()))),
            store,
            config,
        }
    }
}
