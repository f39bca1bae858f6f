//! Application state for the HTTP server.

use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::db::repository::FullRepository;
use crate::services::ReservationNotifier;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for store operations
    pub repository: Arc<dyn FullRepository>,
    /// Token signing configuration
    pub auth: AuthConfig,
    /// Confirmation e-mail sink
    pub notifier: Arc<dyn ReservationNotifier>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        auth: AuthConfig,
        notifier: Arc<dyn ReservationNotifier>,
    ) -> Self {
        Self {
            repository,
            auth,
            notifier,
        }
    }
}
