//! Recommendation table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::{CandidateSong, Recommendation};

#[derive(Debug, FromRow)]
struct RecommendationRow {
    id: i64,
    userid: i64,
    imageid: i64,
    song_title: String,
    song_url: String,
    song_thumbnail: String,
}

impl RecommendationRow {
    fn into_recommendation(self) -> Recommendation {
        Recommendation {
            id: self.id,
            userid: self.userid,
            image_id: self.imageid,
            song_title: self.song_title,
            song_url: self.song_url,
            song_thumbnail: self.song_thumbnail,
        }
    }
}

/// Recommendation table operations
pub struct RecommendationTable;

impl RecommendationTable {
    /// Persist a batch of candidates for (user, image) atomically
    ///
    /// Rows are written in source order inside a single transaction: either
    /// the whole batch commits or none of it does.
    pub async fn insert_batch(
        userid: i64,
        imageid: i64,
        candidates: &[CandidateSong],
    ) -> Result<Vec<Recommendation>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let mut tx = pool.begin().await?;
        let mut saved = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let result = sqlx::query(
                "INSERT INTO recommendation (userid, imageid, song_title, song_url, song_thumbnail) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(userid)
            .bind(imageid)
            .bind(&candidate.title)
            .bind(&candidate.video_url)
            .bind(&candidate.thumbnail)
            .execute(&mut *tx)
            .await?;

            saved.push(Recommendation {
                id: result.last_insert_rowid(),
                userid,
                image_id: imageid,
                song_title: candidate.title.clone(),
                song_url: candidate.video_url.clone(),
                song_thumbnail: candidate.thumbnail.clone(),
            });
        }

        tx.commit().await?;
        Ok(saved)
    }

    /// Get a recommendation owned by the given user
    pub async fn get_for_user(id: i64, userid: i64) -> Result<Option<Recommendation>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<RecommendationRow> =
            sqlx::query_as("SELECT * FROM recommendation WHERE id = ? AND userid = ?")
                .bind(id)
                .bind(userid)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|r| r.into_recommendation()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{setup_test_db, ImageTable, UserTable};
    use crate::models::User;

    fn candidates() -> Vec<CandidateSong> {
        vec![
            CandidateSong {
                title: "Sad Song".to_string(),
                video_url: "http://v/1".to_string(),
                thumbnail: "http://t/1".to_string(),
            },
            CandidateSong {
                title: "Sadder Song".to_string(),
                video_url: "http://v/2".to_string(),
                thumbnail: "http://t/2".to_string(),
            },
        ]
    }

    #[tokio::test]
    async fn test_insert_batch_preserves_order() {
        setup_test_db().await.unwrap();

        let user = UserTable::insert(&User::new(
            "recbatch@x.com".to_string(),
            "rec".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();
        let image = ImageTable::insert(user.id, "/uploads/b.jpg").await.unwrap();

        let saved = RecommendationTable::insert_batch(user.id, image.id, &candidates())
            .await
            .unwrap();

        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].song_title, "Sad Song");
        assert_eq!(saved[1].song_title, "Sadder Song");
        assert!(saved[0].id < saved[1].id);
    }

    #[tokio::test]
    async fn test_get_for_user_hides_other_users_rows() {
        setup_test_db().await.unwrap();

        let owner = UserTable::insert(&User::new(
            "recowner@x.com".to_string(),
            "owner".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();
        let other = UserTable::insert(&User::new(
            "recother@x.com".to_string(),
            "other".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap();

        let image = ImageTable::insert(owner.id, "/uploads/c.jpg").await.unwrap();
        let saved = RecommendationTable::insert_batch(owner.id, image.id, &candidates())
            .await
            .unwrap();

        let id = saved[0].id;
        assert!(RecommendationTable::get_for_user(id, owner.id)
            .await
            .unwrap()
            .is_some());
        assert!(RecommendationTable::get_for_user(id, other.id)
            .await
            .unwrap()
            .is_none());
    }
}
