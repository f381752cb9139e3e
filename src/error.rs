//! API error taxonomy and response mapping

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced by request handlers
///
/// Ownership mismatches and genuinely absent rows map to the same not-found
/// variants so existence of another user's data is never revealed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication header is required.")]
    MissingAuth,

    #[error("Invalid token data.")]
    InvalidToken,

    #[error("User not found.")]
    UserNotFound,

    #[error("Playlist not found.")]
    PlaylistNotFound,

    #[error("Recommendation not found.")]
    RecommendationNotFound,

    #[error("Song not found in playlist.")]
    SongNotFound,

    #[error("Feedback not found.")]
    FeedbackNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Emotion detection failed: {0}")]
    Classification(String),

    #[error("Error getting youtube recommendations: {0}")]
    RecommendationSource(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Validation failure for a missing or empty field
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingAuth | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::UserNotFound
            | Self::PlaylistNotFound
            | Self::RecommendationNotFound
            | Self::SongNotFound
            | Self::FeedbackNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::Classification(_) => StatusCode::BAD_REQUEST,
            Self::RecommendationSource(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingAuth.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::PlaylistNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::validation("No language selected").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Classification("no face".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::RecommendationSource("quota".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_ownership_mismatch_is_plain_not_found() {
        // cross-user access must read identically to a missing row
        assert_eq!(ApiError::PlaylistNotFound.to_string(), "Playlist not found.");
        assert_eq!(
            ApiError::SongNotFound.to_string(),
            "Song not found in playlist."
        );
        assert_eq!(ApiError::FeedbackNotFound.to_string(), "Feedback not found.");
        assert_eq!(
            ApiError::FeedbackNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_upstream_failure_messages() {
        assert_eq!(
            ApiError::Classification("no face".into()).to_string(),
            "Emotion detection failed: no face"
        );
        assert_eq!(
            ApiError::RecommendationSource("quota".into()).to_string(),
            "Error getting youtube recommendations: quota"
        );
    }
}
