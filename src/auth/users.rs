/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// User email address (stored trimmed and lowercased)
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Optional display name
    pub name: Option<String>,
    /// Set when the verification token is redeemed; null until then
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str =
    "id, email, password_hash, name, email_verified_at, created_at, updated_at";

/// Create a new user (unverified)
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email (already normalized)
/// * `password_hash` - Hashed password
/// * `name` - Optional display name
///
/// # Returns
/// Created user or error
pub async fn create_user(
    pool: &PgPool,
    email: String,
    password_hash: String,
    name: Option<String>,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, name, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, email, password_hash, name, email_verified_at, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&email)
    .bind(&password_hash)
    .bind(&name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Mark a user's email address as verified
///
/// One-way transition; the timestamp is never cleared again.
pub async fn mark_email_verified(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET email_verified_at = $1, updated_at = $1
        WHERE id = $2
        RETURNING id, email, password_hash, name, email_verified_at, created_at, updated_at
        "#,
    )
    .bind(now)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Replace a user's password hash
pub async fn set_password_hash(
    pool: &PgPool,
    id: Uuid,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
