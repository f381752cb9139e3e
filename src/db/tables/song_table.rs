//! Playlist song table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::PlaylistSong;

#[derive(Debug, FromRow)]
struct SongRow {
    id: i64,
    playlistid: i64,
    title: String,
    url: String,
    thumbnail_url: String,
    added_at: String,
}

impl SongRow {
    fn into_song(self) -> PlaylistSong {
        PlaylistSong {
            id: self.id,
            playlistid: self.playlistid,
            title: self.title,
            url: self.url,
            thumbnail_url: self.thumbnail_url,
            added_at: self.added_at,
        }
    }
}

/// Playlist song table operations
pub struct SongTable;

impl SongTable {
    /// Insert a song snapshot into a playlist owned by the given user
    ///
    /// Ownership check, insert and playlist timestamp update run in one
    /// transaction, so a playlist deleted concurrently reads as absent
    /// instead of tripping the foreign key. Fields are copied values, not
    /// references to the source recommendation. `added_at` is written once
    /// here and never updated.
    pub async fn insert_scoped(
        playlistid: i64,
        userid: i64,
        title: &str,
        url: &str,
        thumbnail_url: &str,
    ) -> Result<Option<PlaylistSong>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let mut tx = pool.begin().await?;

        let owned: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM playlist WHERE id = ? AND userid = ?")
                .bind(playlistid)
                .bind(userid)
                .fetch_optional(&mut *tx)
                .await?;

        if owned.is_none() {
            return Ok(None);
        }

        let added_at = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO playlist_song (playlistid, title, url, thumbnail_url, added_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(playlistid)
        .bind(title)
        .bind(url)
        .bind(thumbnail_url)
        .bind(&added_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE playlist SET updated_at = ? WHERE id = ?")
            .bind(&added_at)
            .bind(playlistid)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(PlaylistSong {
            id: result.last_insert_rowid(),
            playlistid,
            title: title.to_string(),
            url: url.to_string(),
            thumbnail_url: thumbnail_url.to_string(),
            added_at,
        }))
    }

    /// All songs of a playlist, in insertion order
    pub async fn all_for_playlist(playlistid: i64) -> Result<Vec<PlaylistSong>> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let rows: Vec<SongRow> =
            sqlx::query_as("SELECT * FROM playlist_song WHERE playlistid = ? ORDER BY id ASC")
                .bind(playlistid)
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|r| r.into_song()).collect())
    }

    /// Delete a song from a playlist owned by the given user
    ///
    /// Single statement: the owner check and the delete cannot be split by
    /// a concurrent playlist mutation. Returns false when the song does not
    /// exist in that playlist or the playlist is not owned by the user.
    pub async fn delete_scoped(songid: i64, playlistid: i64, userid: i64) -> Result<bool> {
        let engine = DbEngine::get()?;
        let pool = engine.pool();

        let result = sqlx::query(
            "DELETE FROM playlist_song WHERE id = ? AND playlistid IN \
             (SELECT id FROM playlist WHERE id = ? AND userid = ?)",
        )
        .bind(songid)
        .bind(playlistid)
        .bind(userid)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{setup_test_db, PlaylistTable, UserTable};
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
    async fn test_songs_are_copied_snapshots() {
        setup_test_db().await.unwrap();

        let user = make_user("song-copy@x.com").await;
        let playlist = PlaylistTable::insert(user, "Chill").await.unwrap();

        let song = SongTable::insert_scoped(playlist.id, user, "Sad Song", "http://v/1", "http://t/1")
            .await
            .unwrap()
            .unwrap();
        assert!(!song.added_at.is_empty());

        let songs = SongTable::all_for_playlist(playlist.id).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].title, "Sad Song");
        assert_eq!(songs[0].url, "http://v/1");
        assert_eq!(songs[0].thumbnail_url, "http://t/1");

        // adding a song moves the playlist's updated_at forward
        let touched = PlaylistTable::get_for_user(playlist.id, user)
            .await
            .unwrap()
            .unwrap();
        assert_ne!(touched.updated_at, playlist.updated_at);
    }

    #[tokio::test]
    async fn test_insert_scoped_rejects_foreign_or_deleted_playlist() {
        setup_test_db().await.unwrap();

        let owner = make_user("song-ins-owner@x.com").await;
        let other = make_user("song-ins-other@x.com").await;
        let playlist = PlaylistTable::insert(owner, "Guarded").await.unwrap();

        assert!(
            SongTable::insert_scoped(playlist.id, other, "Nope", "http://v/7", "http://t/7")
                .await
                .unwrap()
                .is_none()
        );

        PlaylistTable::delete_for_user(playlist.id, owner)
            .await
            .unwrap()
            .unwrap();

        // the playlist is gone: the insert reads it as absent, no FK error
        assert!(
            SongTable::insert_scoped(playlist.id, owner, "Late", "http://v/7", "http://t/7")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_scoped_rejects_foreign_owner() {
        setup_test_db().await.unwrap();

        let owner = make_user("song-del-owner@x.com").await;
        let other = make_user("song-del-other@x.com").await;
        let playlist = PlaylistTable::insert(owner, "Mine").await.unwrap();

        let song = SongTable::insert_scoped(playlist.id, owner, "Keep", "http://v/2", "http://t/2")
            .await
            .unwrap()
            .unwrap();

        assert!(!SongTable::delete_scoped(song.id, playlist.id, other)
            .await
            .unwrap());
        assert!(SongTable::delete_scoped(song.id, playlist.id, owner)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_removing_removed_song_is_a_clean_miss() {
        setup_test_db().await.unwrap();

        let user = make_user("song-idem@x.com").await;
        let playlist = PlaylistTable::insert(user, "Loop").await.unwrap();

        let first = SongTable::insert_scoped(playlist.id, user, "Gone", "http://v/3", "http://t/3")
            .await
            .unwrap()
            .unwrap();
        let second = SongTable::insert_scoped(playlist.id, user, "Stays", "http://v/4", "http://t/4")
            .await
            .unwrap()
            .unwrap();

        assert!(SongTable::delete_scoped(first.id, playlist.id, user)
            .await
            .unwrap());
        // second attempt reports a miss and leaves siblings alone
        assert!(!SongTable::delete_scoped(first.id, playlist.id, user)
            .await
            .unwrap());

        let songs = SongTable::all_for_playlist(playlist.id).await.unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id, second.id);
    }
}
