// Database repository for user records

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::auth::{error::AuthError, models::User};

/// User repository for database operations
///
/// Every credential lookup filters on active = TRUE so deactivated accounts
/// cannot log in, pass the middleware, or receive reset tokens.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the customer role
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, role, password_hash, password_changed_at,
                      reset_token_hash, reset_token_expires_at, active, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique index on LOWER(email)
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Find an active user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, password_changed_at,
                   reset_token_hash, reset_token_expires_at, active, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1) AND active = TRUE
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Find an active user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, password_changed_at,
                   reset_token_hash, reset_token_expires_at, active, created_at
            FROM users
            WHERE id = $1 AND active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Check if an email is already registered
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(exists.0)
    }

    /// Store a reset token hash and its expiry on a user
    pub async fn set_reset_token(
        &self,
        user_id: i32,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = $1, reset_token_expires_at = $2 WHERE id = $3",
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Clear any outstanding reset token on a user
    pub async fn clear_reset_token(&self, user_id: i32) -> Result<(), AuthError> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = NULL, reset_token_expires_at = NULL WHERE id = $1",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// Find the active user holding an unexpired reset token with this hash
    pub async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, password_changed_at,
                   reset_token_hash, reset_token_expires_at, active, created_at
            FROM users
            WHERE reset_token_hash = $1 AND reset_token_expires_at > NOW() AND active = TRUE
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Replace a user's password hash
    ///
    /// Stamps password_changed_at and clears any outstanding reset token in
    /// the same statement, so earlier session tokens and the consumed reset
    /// token become invalid together.
    pub async fn update_password(
        &self,
        user_id: i32,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $1,
                password_changed_at = NOW(),
                reset_token_hash = NULL,
                reset_token_expires_at = NULL
            WHERE id = $2
            RETURNING id, name, email, role, password_hash, password_changed_at,
                      reset_token_hash, reset_token_expires_at, active, created_at
            "#,
        )
        .bind(password_hash)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(user)
    }

    /// Update a user's profile fields, keeping current values where None
    pub async fn update_profile(
        &self,
        user_id: i32,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email)
            WHERE id = $3
            RETURNING id, name, email, role, password_hash, password_changed_at,
                      reset_token_hash, reset_token_expires_at, active, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Soft-delete a user; the email stays reserved while the row exists
    pub async fn deactivate(&self, user_id: i32) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// List all active users, newest first
    pub async fn list_active(&self) -> Result<Vec<User>, AuthError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, role, password_hash, password_changed_at,
                   reset_token_hash, reset_token_expires_at, active, created_at
            FROM users
            WHERE active = TRUE
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(users)
    }
}
