/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * The signing secret is injected through `SessionKeys` (built once from the
 * configuration at startup) rather than read from the environment at call
 * sites, so tests and multi-instance deployments control it explicitly.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Session token lifetime: 7 days
const TOKEN_LIFETIME_SECS: u64 = 7 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// HMAC keys for signing and verifying session tokens
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `keys` - Session signing keys
/// * `user_id` - User ID (UUID)
/// * `email` - User email
///
/// # Returns
/// JWT token string, valid for 7 days
pub fn create_token(
    keys: &SessionKeys,
    user_id: uuid::Uuid,
    email: String,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = Claims {
        sub: user_id.to_string(),
        email,
        exp: now + TOKEN_LIFETIME_SECS,
        iat: now,
    };

    encode(&Header::default(), &claims, &keys.encoding)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `keys` - Session signing keys
/// * `token` - JWT token string
///
/// # Returns
/// Decoded claims or error (bad signature, malformed, expired)
pub fn verify_token(
    keys: &SessionKeys,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(token, &keys.decoding, &Validation::default())?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> SessionKeys {
        SessionKeys::new("test-secret")
    }

    #[test]
    fn test_create_token() {
        let user_id = uuid::Uuid::new_v4();
        let result = create_token(&test_keys(), user_id, "test@example.com".to_string());
        assert!(result.is_ok());
        assert!(!result.unwrap().is_empty());
    }

    #[test]
    fn test_verify_token_roundtrip() {
        let keys = test_keys();
        let user_id = uuid::Uuid::new_v4();
        let email = "test@example.com".to_string();
        let token = create_token(&keys, user_id, email.clone()).unwrap();

        let claims = verify_token(&keys, &token).unwrap();
        assert_eq!(claims.email, email);
        assert_eq!(claims.sub, user_id.to_string());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_lifetime_is_seven_days() {
        let keys = test_keys();
        let token = create_token(&keys, uuid::Uuid::new_v4(), "a@x.com".to_string()).unwrap();
        let claims = verify_token(&keys, &token).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_verify_invalid_token() {
        let result = verify_token(&test_keys(), "invalid.token.here");
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token =
            create_token(&test_keys(), uuid::Uuid::new_v4(), "a@x.com".to_string()).unwrap();
        let other = SessionKeys::new("another-secret");
        assert!(verify_token(&other, &token).is_err());
    }
}
