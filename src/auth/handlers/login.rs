/**
 * Login Handler
 *
 * Implements POST /api/auth/login.
 *
 * Unknown email and wrong password produce the same generic message so
 * the endpoint cannot be used to enumerate accounts. An unverified email
 * gets its own message instructing the user to confirm first.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::auth::sessions::create_token;
use crate::auth::users::get_user_by_email;
use crate::error::ApiError;
use crate::server::state::AppState;

/// Login handler
///
/// # Errors
///
/// * `400` - blank email or password
/// * `401` - unknown email or wrong password (same message for both)
/// * `401` - email not yet verified
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();
    let password = request.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation(
            "E-Mail und Passwort sind erforderlich.",
        ));
    }

    let user = get_user_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| ApiError::auth("Ungültige E-Mail oder Passwort."))?;

    if !verify(password, &user.password_hash)? {
        return Err(ApiError::auth("Ungültige E-Mail oder Passwort."));
    }

    if user.email_verified_at.is_none() {
        return Err(ApiError::auth(
            "Bitte bestätige zuerst deine E-Mail-Adresse über den Link in der Registrierungs-E-Mail.",
        ));
    }

    let token = create_token(&state.keys, user.id, user.email.clone())?;

    tracing::info!("User logged in: {}", user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
