/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication handlers.
 */

use serde::{Deserialize, Serialize};

use crate::auth::users::User;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    /// User's email address (normalized to lowercase before storage)
    pub email: String,
    /// User's password (at least 8 characters, hashed before storage)
    pub password: String,
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Verify-email request body (the GET variant uses a query parameter)
#[derive(Deserialize, Serialize, Debug)]
pub struct VerifyEmailRequest {
    pub token: String,
}

/// Query parameter for the GET verify-email link
#[derive(Deserialize, Debug)]
pub struct VerifyEmailQuery {
    #[serde(default)]
    pub token: Option<String>,
}

/// Forgot-password request
#[derive(Deserialize, Serialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Reset-password request
#[derive(Deserialize, Serialize, Debug)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

/// Change-password request (authenticated)
#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// User response (without sensitive data)
///
/// Contains user information that is safe to return to clients.
/// Does not include the password hash.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub email_verified_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email,
            name: user.name,
            email_verified_at: user.email_verified_at,
        }
    }
}

/// Returned by register: the created (unverified) user and a confirmation
#[derive(Serialize, Debug)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub message: String,
}

/// Returned by login: the user and a 7-day session token
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Generic confirmation message
#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
