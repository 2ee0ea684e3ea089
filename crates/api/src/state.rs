use std::sync::Arc;

use foyer_sync::RemoteStore;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Store every manager and reconciler talks to.
    pub store: Arc<dyn RemoteStore>,
    pub config: Arc<ServerConfig>,
    /// Live checklist sessions.
    pub ws_manager: Arc<WsManager>,
}
