/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * All process-wide collaborators (database pool, session keys, mailer,
 * image storage) are constructed once during startup and injected here;
 * nothing is lazily initialized from module-level globals.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::auth::sessions::SessionKeys;
use crate::email::EmailService;
use crate::images::storage::ImageStorage;

/// Central state container for the Axum application
///
/// Everything is cheaply cloneable: `PgPool` is an internal Arc, and the
/// other members are small or Arc-backed themselves.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// HMAC keys for session tokens
    pub keys: SessionKeys,
    /// Outgoing mail transport
    pub mailer: EmailService,
    /// Image file storage rooted at the configured storage directory
    pub storage: ImageStorage,
}

/// Allows handlers to take `State(pool): State<PgPool>` directly.
impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.keys.clone()
    }
}

impl FromRef<AppState> for EmailService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.mailer.clone()
    }
}

impl FromRef<AppState> for ImageStorage {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.storage.clone()
    }
}
