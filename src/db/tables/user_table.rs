//! User table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::User;

/// Database row for user table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    username: String,
    password: String,
    profile_picture: String,
    date_joined: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            username: self.username,
            password: self.password,
            profile_picture: self.profile_picture,
            date_joined: self.date_joined,
        }
    }
}

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Get user by email
    pub async fn get_by_email(email: &str) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Check if an email is already registered
    pub async fn email_exists(email: &str) -> Result<bool> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user WHERE email = ?")
            .bind(email)
            .fetch_one(pool)
            .await?;

        Ok(row.0 > 0)
    }

    /// Insert a user, returning the stored record
    pub async fn insert(user: &User) -> Result<User> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let result = sqlx::query(
            "INSERT INTO user (email, username, password, date_joined) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.date_joined)
        .execute(pool)
        .await?;

        let mut stored = user.clone();
        stored.id = result.last_insert_rowid();
        Ok(stored)
    }

    /// Get user by id
    pub async fn get_by_id(id: i64) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM user WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Update a user's display name, returning the stored record
    ///
    /// The email identity stays immutable; it is the token subject.
    pub async fn update_username(id: i64, username: &str) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let result = sqlx::query("UPDATE user SET username = ? WHERE id = ?")
            .bind(username)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_by_id(id).await
    }

    /// Update a user's profile picture path, returning the stored record
    pub async fn update_picture(id: i64, path: &str) -> Result<Option<User>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let result = sqlx::query("UPDATE user SET profile_picture = ? WHERE id = ?")
            .bind(path)
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::get_by_id(id).await
    }

    /// Get user count
    pub async fn count() -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
            .fetch_one(pool)
            .await?;

        Ok(row.0)
    }
}
