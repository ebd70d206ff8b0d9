/**
 * Password Handlers
 *
 * Implements the three password flows:
 *
 * - POST /api/auth/forgot-password - issue a 1-hour reset token and mail
 *   the link. The response is the same whether or not the account exists,
 *   so the endpoint cannot be used to enumerate accounts.
 * - POST /api/auth/reset-password - redeem a reset token and store a new
 *   password hash. Tokens are single-use.
 * - POST /api/auth/change-password - authenticated change given the
 *   current password.
 */

use axum::{extract::State, response::Json};
use bcrypt::{hash, verify};

use crate::auth::handlers::register::{HASH_COST, MIN_PASSWORD_LEN};
use crate::auth::handlers::types::{
    ChangePasswordRequest, ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::auth::tokens::{consume_reset_token, create_reset_token};
use crate::auth::users::{get_user_by_email, get_user_by_id, set_password_hash};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::server::state::AppState;

const FORGOT_MESSAGE: &str =
    "Falls ein Konto mit dieser E-Mail existiert, wurde eine E-Mail zum Zurücksetzen des Passworts verschickt.";

/// Forgot-password handler
///
/// Issues a fresh reset token (invalidating any earlier ones) and mails
/// the link when the account exists. Always answers with the same
/// generic confirmation.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::validation("E-Mail ist erforderlich."));
    }

    if let Some(user) = get_user_by_email(&state.pool, &email).await? {
        let token = create_reset_token(&state.pool, user.id).await?;
        state
            .mailer
            .send_password_reset_email(&user.email, &token, user.name.as_deref())
            .await?;
        tracing::info!("Password reset requested: {}", user.email);
    }

    Ok(Json(MessageResponse {
        message: FORGOT_MESSAGE.to_string(),
    }))
}

/// Reset-password handler
///
/// # Errors
///
/// * `400` - blank token or new password shorter than 8 characters
/// * `401` - unknown, expired or already-used token
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let token = request.token.trim();
    let password = request.password.trim();

    if token.is_empty() {
        return Err(ApiError::validation("Token fehlt."));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(
            "Das Passwort muss mindestens 8 Zeichen haben.",
        ));
    }

    let user_id = consume_reset_token(&state.pool, token).await?.ok_or_else(|| {
        ApiError::auth(
            "Ungültiger oder abgelaufener Link. Bitte fordere einen neuen Link zum Zurücksetzen des Passworts an.",
        )
    })?;

    let password_hash = hash(password, HASH_COST)?;
    set_password_hash(&state.pool, user_id, &password_hash).await?;

    tracing::info!("Password reset completed for user {}", user_id);

    Ok(Json(MessageResponse {
        message: "Passwort wurde erfolgreich zurückgesetzt. Du kannst dich jetzt anmelden."
            .to_string(),
    }))
}

/// Change-password handler (authenticated)
///
/// # Errors
///
/// * `400` - blank current password or new password shorter than 8 characters
/// * `401` - current password does not match the stored hash
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let current = request.current_password.trim();
    let next = request.new_password.trim();

    if current.is_empty() {
        return Err(ApiError::validation("Aktuelles Passwort ist erforderlich."));
    }
    if next.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(
            "Das neue Passwort muss mindestens 8 Zeichen haben.",
        ));
    }

    let stored = get_user_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Benutzer nicht gefunden."))?;

    if !verify(current, &stored.password_hash)? {
        return Err(ApiError::auth("Aktuelles Passwort ist falsch."));
    }

    let password_hash = hash(next, HASH_COST)?;
    set_password_hash(&state.pool, stored.id, &password_hash).await?;

    tracing::info!("Password changed: {}", stored.email);

    Ok(Json(MessageResponse {
        message: "Passwort wurde geändert.".to_string(),
    }))
}
