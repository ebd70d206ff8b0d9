/**
 * Router Configuration
 *
 * Assembles the full Axum router:
 *
 * 1. Public auth routes
 * 2. Protected API routes (behind the auth middleware)
 * 3. `/uploads` static file service for stored images
 * 4. Fallback handler (JSON 404)
 *
 * The CORS layer allows the single configured frontend origin; the body
 * limit is raised above axum's default so a full multipart upload
 * (10 files at 6MB) fits.
 */

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Json};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::images::storage::{MAX_FILES_PER_UPLOAD, MAX_FILE_SIZE};
use crate::routes::api_routes::{protected_routes, public_routes};
use crate::server::config::Config;
use crate::server::state::AppState;

/// Multipart overhead margin on top of the raw file bytes
const BODY_LIMIT: usize = MAX_FILES_PER_UPLOAD * MAX_FILE_SIZE + 1024 * 1024;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Shared application state (pool, keys, mailer, storage)
/// * `config` - Runtime configuration (CORS origin)
pub fn create_router(app_state: AppState, config: &Config) -> Router<()> {
    let cors = cors_layer(&config.cors_origin);

    Router::new()
        .merge(public_routes())
        .merge(protected_routes(app_state.clone()))
        .nest_service("/uploads", ServeDir::new(app_state.storage.root()))
        .fallback(not_found)
        .layer(cors)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(app_state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS_ORIGIN {:?}, CORS disabled", origin);
            layer
        }
    }
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found." })),
    )
}
