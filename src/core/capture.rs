//! Recommendation capture workflow
//!
//! Records an uploaded photo, the externally classified emotion and the
//! batch of recommended songs as durable rows tied to the acting user.

use serde::Serialize;

use crate::config::Paths;
use crate::db::{ImageTable, RecommendationTable};
use crate::error::ApiError;
use crate::models::{capitalize_emotion, FaceRegion, Recommendation};
use crate::services::{Classifier, RecommendationSource};
use crate::utils::filesystem::save_upload;

/// One multipart photo field as received from the client
#[derive(Debug, Default)]
pub struct UploadedPhoto {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Result of one capture invocation
#[derive(Debug, Serialize)]
pub struct CaptureOutcome {
    pub face_coordinates: FaceRegion,
    pub emotion: String,
    pub recommendations: Vec<Recommendation>,
}

/// Run the capture workflow for one authenticated user
///
/// Validation happens before any filesystem or external call. The image row
/// is committed before classification is attempted so a failed classifier
/// still leaves an audit trail; the recommendation batch itself commits
/// atomically or not at all.
pub async fn capture(
    userid: i64,
    photo: Option<UploadedPhoto>,
    language: Option<&str>,
    classifier: &dyn Classifier,
    recommender: &dyn RecommendationSource,
) -> Result<CaptureOutcome, ApiError> {
    let language = language
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or_else(|| ApiError::validation("No language selected"))?;

    let photo = photo
        .filter(|p| !p.bytes.is_empty())
        .ok_or_else(|| ApiError::validation("No image uploaded"))?;

    let paths = Paths::get()?;
    let stored_path = save_upload(
        &paths.uploads_dir(),
        userid,
        photo.filename.as_deref(),
        photo.content_type.as_deref(),
        &photo.bytes,
    )
    .map_err(|e| ApiError::Internal(format!("Error uploading image: {}", e)))?;

    let image = ImageTable::insert(userid, &stored_path.to_string_lossy())
        .await
        .map_err(|e| ApiError::Internal(format!("Error uploading image: {}", e)))?;

    let detection = classifier
        .classify(&stored_path)
        .await
        .map_err(|e| ApiError::Classification(e.to_string()))?;

    let emotion = capitalize_emotion(&detection.emotion);

    let candidates = recommender
        .search(&emotion, language)
        .await
        .map_err(|e| ApiError::RecommendationSource(e.to_string()))?;

    let recommendations = RecommendationTable::insert_batch(userid, image.id, &candidates)
        .await
        .map_err(|e| ApiError::Internal(format!("Error creating recommendation: {}", e)))?;

    Ok(CaptureOutcome {
        face_coordinates: detection.region,
        emotion,
        recommendations,
    })
}
