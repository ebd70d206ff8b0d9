/**
 * Server Initialization
 *
 * Builds the running application from a loaded `Config`:
 *
 * 1. Connect the PostgreSQL pool (required; startup fails without it)
 * 2. Run pending migrations
 * 3. Construct session keys, mailer and image storage
 * 4. Assemble `AppState` and the router
 *
 * Unlike services that can limp along without persistence, every
 * endpoint here touches the database, so a missing or unreachable
 * `DATABASE_URL` aborts startup instead of degrading.
 */

use axum::Router;
use sqlx::postgres::PgPoolOptions;

use crate::auth::sessions::SessionKeys;
use crate::email::EmailService;
use crate::error::ApiError;
use crate::images::storage::ImageStorage;
use crate::routes::create_router;
use crate::server::config::Config;
use crate::server::state::AppState;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the database is unreachable, migrations cannot be applied,
/// or the mail transport cannot be constructed.
pub async fn create_app(config: &Config) -> Result<Router<()>, ApiError> {
    tracing::info!("Initializing timeline server");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Database pool connected");

    sqlx::migrate!().run(&pool).await.map_err(|e| {
        ApiError::internal(format!("Migration failed: {e}"))
    })?;
    tracing::info!("Migrations applied");

    let keys = SessionKeys::new(&config.jwt_secret);
    let mailer = EmailService::from_config(config)?;
    let storage = ImageStorage::new(config.storage_dir.clone());

    let app_state = AppState {
        pool,
        keys,
        mailer,
        storage,
    };

    Ok(create_router(app_state, config))
}
