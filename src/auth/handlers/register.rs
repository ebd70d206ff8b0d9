/**
 * Registration Handler
 *
 * Implements POST /api/auth/register.
 *
 * # Registration Process
 *
 * 1. Normalize the email (trim + lowercase) and validate inputs
 * 2. Reject duplicate emails
 * 3. Hash the password with bcrypt (cost 10)
 * 4. Create the user row, still unverified
 * 5. Create a 24-hour verification token
 * 6. Send the verification email (failure propagates - the mail IS the flow)
 *
 * The new account cannot log in until the emailed token is redeemed.
 */

use axum::{extract::State, response::Json};
use bcrypt::hash;

use crate::auth::handlers::types::{RegisterRequest, RegisterResponse, UserResponse};
use crate::auth::tokens::create_verification_token;
use crate::auth::users::{create_user, get_user_by_email};
use crate::error::{is_unique_violation, ApiError};
use crate::server::state::AppState;

/// bcrypt cost factor for password hashing
pub const HASH_COST: u32 = 10;
/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Register handler
///
/// # Errors
///
/// * `400` - blank email/password or password shorter than 8 characters
/// * `400` - an account with this email already exists
/// * `500` - hashing, database or email failure
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();
    let password = request.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation(
            "E-Mail und Passwort sind erforderlich.",
        ));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(
            "Das Passwort muss mindestens 8 Zeichen haben.",
        ));
    }

    if get_user_by_email(&state.pool, &email).await?.is_some() {
        return Err(ApiError::conflict(
            "Ein Konto mit dieser E-Mail-Adresse existiert bereits.",
        ));
    }

    let password_hash = hash(password, HASH_COST)?;
    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    let user = create_user(&state.pool, email, password_hash, name)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                // The pre-check raced with a concurrent registration
                ApiError::conflict("Ein Konto mit dieser E-Mail-Adresse existiert bereits.")
            } else {
                e.into()
            }
        })?;

    let token = create_verification_token(&state.pool, user.id).await?;
    state
        .mailer
        .send_verification_email(&user.email, &token, user.name.as_deref())
        .await?;

    tracing::info!("User registered: {}", user.email);

    Ok(Json(RegisterResponse {
        user: UserResponse::from(user),
        message: "Registrierung erfolgreich. Bitte bestätige deine E-Mail-Adresse über den Link in der E-Mail.".to_string(),
    }))
}
