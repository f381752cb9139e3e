//! Emotion detection API routes

use actix_multipart::Multipart;
use actix_web::{post, web, HttpRequest, HttpResponse};

use crate::api::{read_upload_form, require_user};
use crate::core::capture::capture;
use crate::error::ApiError;
use crate::services::Services;

/// POST /emotion/detect
///
/// Multipart body with an `image` file field and a `language` text field.
#[post("/detect")]
pub async fn detect_emotion(
    req: HttpRequest,
    mut payload: Multipart,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let (photo, language) = read_upload_form(&mut payload).await?;

    let outcome = capture(
        user.id,
        photo,
        language.as_deref(),
        services.classifier.as_ref(),
        services.recommender.as_ref(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "face_coordinates": outcome.face_coordinates,
        "emotion": outcome.emotion,
        "recommendations": outcome.recommendations,
    })))
}

/// configure emotion routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(detect_emotion);
}
