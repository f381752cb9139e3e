//! Feedback API routes
//!
//! Entries are user-owned and start unpublished; only published entries
//! appear on the public wall.

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::api::require_user;
use crate::db::FeedbackTable;
use crate::error::ApiError;
use crate::services::Services;

#[derive(Debug, Deserialize)]
pub struct AddFeedbackBody {
    pub message: Option<String>,
}

/// POST /feedback/new
#[post("/new")]
pub async fn add_feedback(
    req: HttpRequest,
    body: web::Json<AddFeedbackBody>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let message = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::validation("Feedback message is required."))?;

    let feedback = FeedbackTable::insert(user.id, message).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "Feedback added successfully.",
        "feedback": feedback,
    })))
}

/// POST /feedback/{feedbackid}/publish
#[post("/{feedbackid}/publish")]
pub async fn toggle_publish_feedback(
    req: HttpRequest,
    path: web::Path<i64>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let feedback = FeedbackTable::toggle_publish(path.into_inner(), user.id)
        .await?
        .ok_or(ApiError::FeedbackNotFound)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Feedback updated successfully.",
        "feedback": feedback,
    })))
}

/// GET /feedback
#[get("")]
pub async fn get_user_feedbacks(
    req: HttpRequest,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let feedbacks = FeedbackTable::all_for_user(user.id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Feedbacks fetched successfully.",
        "feedbacks": feedbacks,
    })))
}

/// GET /feedback/published
///
/// Public wall, no authentication required.
#[get("/published")]
pub async fn get_published_feedbacks() -> Result<HttpResponse, ApiError> {
    let feedbacks = FeedbackTable::all_published().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Feedbacks fetched successfully.",
        "feedbacks": feedbacks,
    })))
}

/// configure feedback routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_feedback)
        .service(toggle_publish_feedback)
        .service(get_user_feedbacks)
        .service(get_published_feedbacks);
}
