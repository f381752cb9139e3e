//! Feedback table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::{Feedback, PublishedFeedback};

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: i64,
    userid: i64,
    message: String,
    published: bool,
    created_at: String,
}

impl FeedbackRow {
    fn into_feedback(self) -> Feedback {
        Feedback {
            id: self.id,
            userid: self.userid,
            message: self.message,
            published: self.published,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct PublishedRow {
    id: i64,
    username: String,
    message: String,
    created_at: String,
}

/// Feedback table operations
pub struct FeedbackTable;

impl FeedbackTable {
    /// Insert feedback for a user; new entries start unpublished
    pub async fn insert(userid: i64, message: &str) -> Result<Feedback> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let created_at = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO feedback (userid, message, published, created_at) VALUES (?, ?, 0, ?)",
        )
        .bind(userid)
        .bind(message)
        .bind(&created_at)
        .execute(pool)
        .await?;

        Ok(Feedback {
            id: result.last_insert_rowid(),
            userid,
            message: message.to_string(),
            published: false,
            created_at,
        })
    }

    /// All feedback entries owned by a user, in creation order
    pub async fn all_for_user(userid: i64) -> Result<Vec<Feedback>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<FeedbackRow> =
            sqlx::query_as("SELECT * FROM feedback WHERE userid = ? ORDER BY id ASC")
                .bind(userid)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|r| r.into_feedback()).collect())
    }

    /// Flip the published flag of a feedback entry owned by the given user
    ///
    /// Lookup and update run in one transaction; an unowned or missing entry
    /// reads as absent.
    pub async fn toggle_publish(id: i64, userid: i64) -> Result<Option<Feedback>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let mut tx = pool.begin().await?;

        let row: Option<FeedbackRow> =
            sqlx::query_as("SELECT * FROM feedback WHERE id = ? AND userid = ?")
                .bind(id)
                .bind(userid)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("UPDATE feedback SET published = NOT published WHERE id = ? AND userid = ?")
            .bind(id)
            .bind(userid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let mut feedback = row.into_feedback();
        feedback.published = !feedback.published;
        Ok(Some(feedback))
    }

    /// All published feedback entries with their author's display name
    pub async fn all_published() -> Result<Vec<PublishedFeedback>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<PublishedRow> = sqlx::query_as(
            "SELECT feedback.id, user.username, feedback.message, feedback.created_at \
             FROM feedback JOIN user ON user.id = feedback.userid \
             WHERE feedback.published = 1 ORDER BY feedback.id ASC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| PublishedFeedback {
                id: r.id,
                username: r.username,
                message: r.message,
                created_at: r.created_at,
            })
            .collect())
    }
}
