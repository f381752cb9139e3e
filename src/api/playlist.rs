//! Playlist API routes
//!
//! Every handler resolves the acting user first and goes through
//! ownership-scoped table operations; unowned rows read as not found.

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::api::require_user;
use crate::db::{PlaylistTable, RecommendationTable, SongTable};
use crate::error::ApiError;
use crate::services::Services;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistBody {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddSongBody {
    pub recommendation_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSongBody {
    pub song_id: Option<i64>,
}

/// GET /playlists
#[get("")]
pub async fn list_playlists(
    req: HttpRequest,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let playlists = PlaylistTable::all_for_user(user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Playlists fetched successfully.",
        "playlists": playlists,
    })))
}

/// POST /playlists/new
#[post("/new")]
pub async fn create_playlist(
    req: HttpRequest,
    body: web::Json<CreatePlaylistBody>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("Playlist name is required."))?;

    let playlist = PlaylistTable::insert(user.id, name).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Playlist created successfully.",
        "id": playlist.id,
        "name": playlist.name,
        "created_at": playlist.created_at,
        "updated_at": playlist.updated_at,
    })))
}

/// DELETE /playlists/{playlistid}
#[delete("/{playlistid}")]
pub async fn delete_playlist(
    req: HttpRequest,
    path: web::Path<i64>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;
    let playlistid = path.into_inner();

    let deleted = PlaylistTable::delete_for_user(playlistid, user.id)
        .await?
        .ok_or(ApiError::PlaylistNotFound)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Playlist deleted successfully.",
        "id": deleted.id,
        "name": deleted.name,
        "created_at": deleted.created_at,
        "updated_at": deleted.updated_at,
    })))
}

/// GET /playlists/{playlistid}
#[get("/{playlistid}")]
pub async fn get_playlist_details(
    req: HttpRequest,
    path: web::Path<i64>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;
    let playlistid = path.into_inner();

    let playlist = PlaylistTable::get_for_user(playlistid, user.id)
        .await?
        .ok_or(ApiError::PlaylistNotFound)?;

    let songs = SongTable::all_for_playlist(playlist.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Playlist details fetched successfully.",
        "songs": songs,
    })))
}

/// POST /playlists/{playlistid}/songs
#[post("/{playlistid}/songs")]
pub async fn add_song_to_playlist(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<AddSongBody>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;
    let playlistid = path.into_inner();

    let playlist = PlaylistTable::get_for_user(playlistid, user.id)
        .await?
        .ok_or(ApiError::PlaylistNotFound)?;

    let recommendation_id = body
        .recommendation_id
        .ok_or_else(|| ApiError::validation("Recommendation id is required."))?;

    // scoped lookup: only the user's own recommendations can be copied
    let recommendation = RecommendationTable::get_for_user(recommendation_id, user.id)
        .await?
        .ok_or(ApiError::RecommendationNotFound)?;

    // the ownership re-check inside the scoped insert closes the window
    // between the lookup above and the write
    let song = SongTable::insert_scoped(
        playlist.id,
        user.id,
        &recommendation.song_title,
        &recommendation.song_url,
        &recommendation.song_thumbnail,
    )
    .await?
    .ok_or(ApiError::PlaylistNotFound)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Song added to playlist successfully.",
        "id": song.id,
        "title": song.title,
        "url": song.url,
        "thumbnail_url": song.thumbnail_url,
        "added_at": song.added_at,
    })))
}

/// POST /playlists/{playlistid}/songs/delete
#[post("/{playlistid}/songs/delete")]
pub async fn delete_song_from_playlist(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<RemoveSongBody>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;
    let playlistid = path.into_inner();

    PlaylistTable::get_for_user(playlistid, user.id)
        .await?
        .ok_or(ApiError::PlaylistNotFound)?;

    let song_id = body
        .song_id
        .ok_or_else(|| ApiError::validation("Song id is required."))?;

    if !SongTable::delete_scoped(song_id, playlistid, user.id).await? {
        return Err(ApiError::SongNotFound);
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Song deleted from playlist successfully.",
    })))
}

/// configure playlist routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_playlists)
        .service(create_playlist)
        .service(delete_playlist)
        .service(get_playlist_details)
        .service(add_song_to_playlist)
        .service(delete_song_from_playlist);
}
