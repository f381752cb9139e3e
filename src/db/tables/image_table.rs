//! Uploaded image table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::UploadedImage;

#[derive(Debug, FromRow)]
struct ImageRow {
    id: i64,
    userid: i64,
    path: String,
    created_at: String,
}

impl ImageRow {
    fn into_image(self) -> UploadedImage {
        UploadedImage {
            id: self.id,
            userid: self.userid,
            path: self.path,
            created_at: self.created_at,
        }
    }
}

/// Uploaded image table operations
pub struct ImageTable;

impl ImageTable {
    /// Insert an uploaded image record for a user
    pub async fn insert(userid: i64, path: &str) -> Result<UploadedImage> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let created_at = chrono::Utc::now().to_rfc3339();

        let result =
            sqlx::query("INSERT INTO uploaded_image (userid, path, created_at) VALUES (?, ?, ?)")
                .bind(userid)
                .bind(path)
                .bind(&created_at)
                .execute(pool)
                .await?;

        Ok(UploadedImage {
            id: result.last_insert_rowid(),
            userid,
            path: path.to_string(),
            created_at,
        })
    }

    /// Number of images uploaded by a user
    pub async fn count_for_user(userid: i64) -> Result<i64> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM uploaded_image WHERE userid = ?")
            .bind(userid)
            .fetch_one(pool)
            .await?;

        Ok(row.0)
    }

    /// Get an image owned by the given user
    pub async fn get_for_user(id: i64, userid: i64) -> Result<Option<UploadedImage>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<ImageRow> =
            sqlx::query_as("SELECT * FROM uploaded_image WHERE id = ? AND userid = ?")
                .bind(id)
                .bind(userid)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|r| r.into_image()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{setup_test_db, UserTable};
    use crate::models::User;

    #[tokio::test]
    async fn test_image_is_ownership_scoped() {
        setup_test_db().await.unwrap();

        let owner = UserTable::insert(&User::new(
            "imageowner@x.com".to_string(),
            "owner".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();
        let other = UserTable::insert(&User::new(
            "imageother@x.com".to_string(),
            "other".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();

        let image = ImageTable::insert(owner.id, "/uploads/a.jpg").await.unwrap();

        assert!(ImageTable::get_for_user(image.id, owner.id)
            .await
            .unwrap()
            .is_some());
        assert!(ImageTable::get_for_user(image.id, other.id)
            .await
            .unwrap()
            .is_none());
    }
}
