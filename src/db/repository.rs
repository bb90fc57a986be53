//! User repository for gator.
//!
//! The identity store: CRUD operations for users.

use tracing::{debug, info};
use uuid::Uuid;

use super::user::{User, UserRow};
use super::{is_unique_violation, DbPool};
use crate::{GatorError, Result};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Register a new user.
    ///
    /// Fails with [`GatorError::DuplicateIdentity`] if the name is taken.
    pub async fn create(&self, name: &str) -> Result<User> {
        let user = User::new(name);

        sqlx::query("INSERT INTO users (id, name, created_at, updated_at) VALUES ($1, $2, $3, $4)")
            .bind(user.id.to_string())
            .bind(&user.name)
            .bind(user.created_at.to_rfc3339())
            .bind(user.updated_at.to_rfc3339())
            .execute(self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    GatorError::DuplicateIdentity(name.to_string())
                } else {
                    GatorError::from(e)
                }
            })?;

        debug!(user = %user.name, id = %user.id, "user created");
        Ok(user)
    }

    /// Get a user by name.
    pub async fn get(&self, name: &str) -> Result<User> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| GatorError::NotFound(format!("user {name}")))
    }

    /// Look up a user by name, `None` if absent.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// List all users ordered by name.
    pub async fn list(&self) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, created_at, updated_at FROM users ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Delete every user. Feeds and follows cascade.
    ///
    /// Returns the number of deleted users.
    pub async fn delete_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users").execute(self.pool).await?;
        info!(deleted = result.rows_affected(), "all users deleted");
        Ok(result.rows_affected())
    }
}
