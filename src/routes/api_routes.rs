/**
 * API Route Configuration
 *
 * All application endpoints live under `/api`. Two groups:
 *
 * - Public auth routes: registration, login, email verification,
 *   forgot/reset password. These must be reachable without a session.
 * - Protected routes: everything else, mounted behind `auth_middleware`
 *   which rejects missing/invalid/expired bearer tokens with 401.
 *
 * # Routes
 *
 * ## Public
 * - `POST /api/auth/register` - create account, send verification email
 * - `POST /api/auth/login` - verify credentials, issue session token
 * - `GET/POST /api/auth/verify-email` - consume verification token
 * - `POST /api/auth/forgot-password` - issue reset token, send email
 * - `POST /api/auth/reset-password` - consume reset token, set password
 *
 * ## Protected
 * - `POST /api/auth/change-password`, `GET /api/auth/me`
 * - `GET|POST /api/timelines`, `GET /api/timelines/slug/{slug}`,
 *   `GET|PUT|DELETE /api/timelines/{id}`
 * - `GET /api/events/important`, `GET /api/events/timeline/{timelineId}`,
 *   `POST /api/events`, `GET|PUT|DELETE /api/events/{id}`
 * - `POST /api/events/{id}/images`,
 *   `DELETE /api/events/{id}/images/{imageId}`,
 *   `PATCH /api/events/{id}/images/{imageId}/main`
 */

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::auth::handlers::{
    change_password, forgot_password, get_me, login, register, reset_password, verify_email,
    verify_email_link,
};
use crate::events::handlers::{
    create_event, delete_event, get_event, get_events_by_timeline, get_important_events,
    update_event,
};
use crate::images::handlers::{delete_image, set_main_image, upload_images};
use crate::middleware::auth::auth_middleware;
use crate::server::state::AppState;
use crate::timelines::handlers::{
    create_timeline, delete_timeline, get_timeline, get_timeline_by_slug, list_timelines,
    update_timeline,
};

/// Auth routes reachable without a session token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route(
            "/api/auth/verify-email",
            get(verify_email_link).post(verify_email),
        )
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
}

/// Routes requiring a valid bearer token
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/me", get(get_me))
        .route("/api/timelines", get(list_timelines).post(create_timeline))
        .route("/api/timelines/slug/{slug}", get(get_timeline_by_slug))
        .route(
            "/api/timelines/{id}",
            get(get_timeline)
                .put(update_timeline)
                .delete(delete_timeline),
        )
        .route("/api/events/important", get(get_important_events))
        .route(
            "/api/events/timeline/{timeline_id}",
            get(get_events_by_timeline),
        )
        .route("/api/events", post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/{id}/images", post(upload_images))
        .route("/api/events/{id}/images/{image_id}", delete(delete_image))
        .route(
            "/api/events/{id}/images/{image_id}/main",
            patch(set_main_image),
        )
        .layer(middleware::from_fn_with_state(state, auth_middleware))
}
