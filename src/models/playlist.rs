//! Playlist models

use serde::{Deserialize, Serialize};

/// A user-owned playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Database ID
    pub id: i64,
    /// Owner user ID
    #[serde(skip_serializing)]
    pub userid: i64,
    /// Playlist name
    pub name: String,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

/// A song inside a playlist
///
/// Stores a snapshot of the source recommendation's fields at the moment it
/// was added. `added_at` is set once at creation and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSong {
    /// Database ID
    pub id: i64,
    /// Parent playlist ID
    #[serde(skip_serializing)]
    pub playlistid: i64,
    pub title: String,
    pub url: String,
    pub thumbnail_url: String,
    pub added_at: String,
}

impl PartialEq for Playlist {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Playlist {}
