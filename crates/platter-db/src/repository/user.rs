//! # User Repository
//!
//! Public user profiles as kept by the identity service, plus the online
//! bookkeeping the dashboard reports on.
//!
//! ## Online Time
//! ```text
//! mark_online(t0)   is_online = 1, last_login = t0
//!       │
//!       ▼
//! mark_offline(t1)  is_online = 0, total_online_secs += t1 - t0
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::fetch_by_ids;
use platter_core::UserProfile;

const USER_COLUMNS: &str = "SELECT id, username, email, full_name, phone_number, address, role, \
     is_online, total_online_secs, last_login, created_at FROM users";

/// Repository for user profile operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user profile.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &UserProfile) -> DbResult<()> {
        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, email, full_name, phone_number, address, role,
                is_online, total_online_secs, last_login, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.phone_number)
        .bind(&user.address)
        .bind(user.role)
        .bind(user.is_online)
        .bind(user.total_online_secs)
        .bind(user.last_login)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<UserProfile>> {
        let sql = format!("{USER_COLUMNS} WHERE id = ?1");
        let user = sqlx::query_as::<_, UserProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Loads several users at once (order owners).
    pub async fn get_many(
        &self,
        ids: impl IntoIterator<Item = String>,
    ) -> DbResult<Vec<UserProfile>> {
        fetch_by_ids(&self.pool, USER_COLUMNS, ids).await
    }

    /// All users, by username.
    pub async fn list(&self) -> DbResult<Vec<UserProfile>> {
        let sql = format!("{USER_COLUMNS} ORDER BY username");
        let users = sqlx::query_as::<_, UserProfile>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Records a login.
    pub async fn mark_online(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Marking user online");

        let result = sqlx::query("UPDATE users SET is_online = 1, last_login = ?2 WHERE id = ?1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }
        Ok(())
    }

    /// Records a logout, adding the session length to the user's total.
    ///
    /// Logging out a user who is not online only clears the flag.
    pub async fn mark_offline(&self, id: &str, at: DateTime<Utc>) -> DbResult<()> {
        debug!(id = %id, "Marking user offline");

        let mut tx = self.pool.begin().await?;

        let row: Option<(bool, Option<DateTime<Utc>>)> =
            sqlx::query_as("SELECT is_online, last_login FROM users WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (is_online, last_login) = row.ok_or_else(|| DbError::not_found("User", id))?;

        let session_secs = match (is_online, last_login) {
            (true, Some(login)) => (at - login).num_seconds().max(0),
            _ => 0,
        };

        sqlx::query(
            "UPDATE users SET is_online = 0, total_online_secs = total_online_secs + ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(session_secs)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
