/**
 * Email Verification Handler
 *
 * Implements GET and POST /api/auth/verify-email. The GET variant exists
 * because the link in the verification mail is opened directly in a
 * browser; it reads the token from the query string.
 *
 * Tokens are consumed atomically (delete-returning), so a second
 * redemption of the same token fails like any unknown token.
 */

use axum::extract::{Query, State};
use axum::response::Json;

use crate::auth::handlers::types::{UserResponse, VerifyEmailQuery, VerifyEmailRequest};
use crate::auth::tokens::consume_verification_token;
use crate::auth::users::mark_email_verified;
use crate::error::ApiError;
use crate::server::state::AppState;

/// POST variant: token in the JSON body
pub async fn verify_email(
    State(state): State<AppState>,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    redeem(&state, &request.token).await
}

/// GET variant: token as query parameter (the emailed link)
pub async fn verify_email_link(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<UserResponse>, ApiError> {
    redeem(&state, query.token.as_deref().unwrap_or_default()).await
}

async fn redeem(state: &AppState, token: &str) -> Result<Json<UserResponse>, ApiError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::validation("Token fehlt."));
    }

    let user_id = consume_verification_token(&state.pool, token)
        .await?
        .ok_or_else(|| {
            ApiError::auth(
                "Ungültiger oder abgelaufener Verifizierungslink. Bitte registriere dich erneut oder fordere einen neuen Link an.",
            )
        })?;

    let user = mark_email_verified(&state.pool, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Benutzer nicht gefunden."))?;

    tracing::info!("Email verified: {}", user.email);

    Ok(Json(UserResponse::from(user)))
}
