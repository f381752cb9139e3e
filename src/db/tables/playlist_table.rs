//! Playlist table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::Playlist;

/// Database row for playlist table
#[derive(Debug, FromRow)]
struct PlaylistRow {
    id: i64,
    userid: i64,
    name: String,
    created_at: String,
    updated_at: String,
}

impl PlaylistRow {
    fn into_playlist(self) -> Playlist {
        Playlist {
            id: self.id,
            userid: self.userid,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Playlist table operations
pub struct PlaylistTable;

impl PlaylistTable {
    /// All playlists owned by a user, in creation order (ascending id)
    pub async fn all_for_user(userid: i64) -> Result<Vec<Playlist>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<PlaylistRow> =
            sqlx::query_as("SELECT * FROM playlist WHERE userid = ? ORDER BY id ASC")
                .bind(userid)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|r| r.into_playlist()).collect())
    }

    /// Get a playlist owned by the given user
    pub async fn get_for_user(id: i64, userid: i64) -> Result<Option<Playlist>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let row: Option<PlaylistRow> =
            sqlx::query_as("SELECT * FROM playlist WHERE id = ? AND userid = ?")
                .bind(id)
                .bind(userid)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(|r| r.into_playlist()))
    }

    /// Insert a playlist, returning the stored record
    pub async fn insert(userid: i64, name: &str) -> Result<Playlist> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO playlist (userid, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(userid)
        .bind(name)
        .bind(&now)
        .bind(&now)
        .execute(pool)
        .await?;

        Ok(Playlist {
            id: result.last_insert_rowid(),
            userid,
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Delete a playlist owned by the given user, returning its prior state
    ///
    /// The ownership check and the delete run in one transaction so the row
    /// cannot change hands in between. Song rows go with it via the
    /// ON DELETE CASCADE constraint.
    pub async fn delete_for_user(id: i64, userid: i64) -> Result<Option<Playlist>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let mut tx = pool.begin().await?;

        let row: Option<PlaylistRow> =
            sqlx::query_as("SELECT * FROM playlist WHERE id = ? AND userid = ?")
                .bind(id)
                .bind(userid)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM playlist WHERE id = ? AND userid = ?")
            .bind(id)
            .bind(userid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(row.into_playlist()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{setup_test_db, SongTable, UserTable};
    use crate::models::User;

    async fn make_user(email: &str) -> i64 {
        UserTable::insert(&User::new(
            email.to_string(),
            "tester".to_string(),
            "hash".to_string(),
        ))
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_listing_is_scoped_and_in_creation_order() {
        setup_test_db().await.unwrap();

        let a = make_user("pl-list-a@x.com").await;
        let b = make_user("pl-list-b@x.com").await;

        PlaylistTable::insert(a, "First").await.unwrap();
        PlaylistTable::insert(a, "Second").await.unwrap();
        PlaylistTable::insert(b, "Theirs").await.unwrap();

        let playlists = PlaylistTable::all_for_user(a).await.unwrap();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].name, "First");
        assert_eq!(playlists[1].name, "Second");
        assert!(playlists.iter().all(|p| p.userid == a));
    }

    #[tokio::test]
    async fn test_cross_user_lookup_is_none() {
        setup_test_db().await.unwrap();

        let a = make_user("pl-get-a@x.com").await;
        let b = make_user("pl-get-b@x.com").await;

        let playlist = PlaylistTable::insert(a, "Chill").await.unwrap();

        assert!(PlaylistTable::get_for_user(playlist.id, a)
            .await
            .unwrap()
            .is_some());
        assert!(PlaylistTable::get_for_user(playlist.id, b)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_songs_and_returns_prior_state() {
        setup_test_db().await.unwrap();

        let a = make_user("pl-del-a@x.com").await;
        let playlist = PlaylistTable::insert(a, "Doomed").await.unwrap();

        SongTable::insert_scoped(playlist.id, a, "Song", "http://v/9", "http://t/9")
            .await
            .unwrap()
            .unwrap();

        let deleted = PlaylistTable::delete_for_user(playlist.id, a)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(deleted.name, "Doomed");

        // no orphaned songs remain queryable
        let songs = SongTable::all_for_playlist(playlist.id).await.unwrap();
        assert!(songs.is_empty());
    }

    #[tokio::test]
    async fn test_cross_user_delete_leaves_playlist_intact() {
        setup_test_db().await.unwrap();

        let a = make_user("pl-keep-a@x.com").await;
        let b = make_user("pl-keep-b@x.com").await;

        let playlist = PlaylistTable::insert(a, "Protected").await.unwrap();
        let song = SongTable::insert_scoped(playlist.id, a, "Kept", "http://v/8", "http://t/8")
            .await
            .unwrap()
            .unwrap();

        assert!(PlaylistTable::delete_for_user(playlist.id, b)
            .await
            .unwrap()
            .is_none());

        // playlist and songs untouched for the true owner
        assert!(PlaylistTable::get_for_user(playlist.id, a)
            .await
            .unwrap()
            .is_some());
        let songs = SongTable::all_for_playlist(playlist.id).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, song.id);
    }
}
