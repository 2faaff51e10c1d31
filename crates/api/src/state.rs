use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::NotificationInbox;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: wishdrop_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Publish/subscribe hub for domain events.
    pub event_bus: Arc<wishdrop_events::EventBus>,
    /// Pending badge notifications per user, fed from the event bus.
    pub inbox: Arc<NotificationInbox>,
}
