/// User model and database operations
///
/// Users are identified by a unique, case-insensitive username and hold
/// memberships in zero or more projects.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username CITEXT NOT NULL UNIQUE,
///     first_name VARCHAR(100) NOT NULL DEFAULT '',
///     last_name VARCHAR(100) NOT NULL DEFAULT '',
///     email VARCHAR(255) NOT NULL DEFAULT '',
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # Signup
///
/// Signup is a two-step write wrapped in a single transaction: the identity
/// row (username + password hash) is inserted first, then the full profile is
/// validated and written. If profile validation fails the transaction is
/// rolled back, so a half-created user is never observable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Username (case-insensitive via CITEXT, unique)
    pub username: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Profile fields validated after the identity row is written
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Profile {
    /// Given name
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,

    /// Family name
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,

    /// Profile fields, validated inside the signup transaction
    pub profile: Profile,
}

/// Error type for the signup flow
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    /// Profile validation failed after the identity write; the transaction
    /// is rolled back before this is returned
    #[error("profile validation failed")]
    InvalidProfile(#[from] validator::ValidationErrors),

    /// Database error (including unique-username violations)
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl User {
    /// Creates a new user via the two-step signup flow
    ///
    /// Step 1 inserts the identity row (username and password hash). Step 2
    /// validates the full profile and writes the remaining fields. Both steps
    /// run in one transaction; a validation failure drops the transaction,
    /// which rolls the identity write back.
    ///
    /// # Errors
    ///
    /// - `SignupError::InvalidProfile` if the profile fields fail validation
    /// - `SignupError::Database` if the username already exists or the
    ///   database is unavailable
    pub async fn signup(pool: &PgPool, data: CreateUser) -> Result<Self, SignupError> {
        let mut tx = pool.begin().await?;

        // Step 1: identity row only.
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, first_name, last_name, email, password_hash,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(&data.username)
        .bind(&data.password_hash)
        .fetch_one(&mut *tx)
        .await?;

        // Step 2: full-record validation. Returning here drops the
        // transaction, which rolls back the identity insert.
        data.profile.validate()?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2, last_name = $3, email = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, first_name, last_name, email, password_hash,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(user.id)
        .bind(&data.profile.first_name)
        .bind(&data.profile.last_name)
        .bind(&data.profile.email)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, email, password_hash,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (case-insensitive via CITEXT)
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, first_name, last_name, email, password_hash,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a user by ID
    ///
    /// Memberships, authored issues, and authored comments cascade.
    ///
    /// # Returns
    ///
    /// True if a user was deleted, false if the id didn't exist
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_profile_valid() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_profile_rejects_empty_first_name() {
        let mut p = profile();
        p.first_name = String::new();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_profile_rejects_bad_email() {
        let mut p = profile();
        p.email = "not-an-email".to_string();
        assert!(p.validate().is_err());
    }

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            username: "ada".to_string(),
            password_hash: "hash".to_string(),
            profile: profile(),
        };

        assert_eq!(create_user.username, "ada");
        assert_eq!(create_user.profile.email, "ada@example.com");
    }

    // Integration tests for the signup transaction are in the api crate's
    // tests/ directory (they require a running database).
}
