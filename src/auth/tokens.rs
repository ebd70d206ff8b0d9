/**
 * Email Verification and Password Reset Tokens
 *
 * Opaque single-use tokens proving control of an email address
 * (verification, 24 hours) or authorizing a password change without the
 * old password (reset, 1 hour). Tokens are deleted on redemption; expired
 * rows simply never match the `expires_at > now()` lookup.
 */

use chrono::{DateTime, Duration, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Verification tokens live for 24 hours
pub const VERIFICATION_EXPIRY_HOURS: i64 = 24;
/// Reset tokens live for 1 hour
pub const RESET_EXPIRY_HOURS: i64 = 1;

/// Generate a random opaque token
///
/// Two v4 UUIDs as plain hex: 64 characters, 244 random bits, matching the
/// unguessability of the usual 32-random-bytes-hex scheme.
pub fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

fn expiry(hours: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours)
}

/// Insert a new email verification token for a user
pub async fn create_verification_token(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query(
        "INSERT INTO email_verification_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(expiry(VERIFICATION_EXPIRY_HOURS))
    .execute(pool)
    .await?;

    Ok(token)
}

/// Issue a password reset token, invalidating any earlier ones
///
/// All existing reset tokens for the user are deleted first, so at most
/// one reset token is redeemable per user at any time.
pub async fn create_reset_token(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;

    let token = generate_token();
    sqlx::query(
        "INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)",
    )
    .bind(&token)
    .bind(user_id)
    .bind(expiry(RESET_EXPIRY_HOURS))
    .execute(pool)
    .await?;

    Ok(token)
}

/// Redeem a verification token: returns the owning user id and deletes the row
///
/// `None` covers unknown, expired and already-consumed tokens alike.
pub async fn consume_verification_token(
    pool: &PgPool,
    token: &str,
) -> Result<Option<Uuid>, sqlx::Error> {
    consume(pool, "email_verification_tokens", token).await
}

/// Redeem a password reset token: returns the owning user id and deletes the row
pub async fn consume_reset_token(pool: &PgPool, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
    consume(pool, "password_reset_tokens", token).await
}

async fn consume(pool: &PgPool, table: &str, token: &str) -> Result<Option<Uuid>, sqlx::Error> {
    // DELETE ... RETURNING makes lookup and consumption one statement,
    // so a token can never be redeemed twice.
    let row = sqlx::query(&format!(
        "DELETE FROM {table} WHERE token = $1 AND expires_at > now() RETURNING user_id"
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get("user_id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_token_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expiry_windows() {
        let verification = expiry(VERIFICATION_EXPIRY_HOURS);
        let reset = expiry(RESET_EXPIRY_HOURS);
        assert!(verification > reset);
        assert!(reset > Utc::now());
    }
}
