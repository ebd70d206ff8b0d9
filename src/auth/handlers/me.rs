/**
 * Current User Handler
 *
 * Implements GET /api/auth/me: returns the profile of the user identified
 * by the bearer token.
 */

use axum::{extract::State, response::Json};

use crate::auth::handlers::types::UserResponse;
use crate::auth::users::get_user_by_id;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

/// Get current user handler
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = get_user_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Benutzer nicht gefunden."))?;

    Ok(Json(UserResponse::from(user)))
}
