//! Authentication API routes

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::api::{read_upload_form, require_user};
use crate::config::Paths;
use crate::db::UserTable;
use crate::error::ApiError;
use crate::models::User;
use crate::services::Services;
use crate::utils::auth::{create_jwt, hash_password, verify_password};
use crate::utils::filesystem::save_upload;

const TOKEN_MAX_AGE: u64 = 30 * 24 * 3600; // 30 days in seconds

/// registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// profile edit request
#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub username: Option<String>,
}

/// register endpoint
#[post("/register")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required."))?;
    let password = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Password is required."))?;

    if UserTable::email_exists(email).await? {
        return Err(ApiError::validation("Email already registered."));
    }

    let username = body
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(email);

    let password_hash = hash_password(password, &services.settings.server_id);
    let user = UserTable::insert(&User::new(
        email.to_string(),
        username.to_string(),
        password_hash,
    ))
    .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "success": true,
        "message": "User registered successfully.",
        "user": user.to_public_value(),
    })))
}

/// login endpoint issuing a bearer jwt
#[post("/login")]
pub async fn login(
    body: web::Json<LoginRequest>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required."))?;
    let password = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation("Password is required."))?;

    let user = UserTable::get_by_email(email)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    if !verify_password(password, &services.settings.server_id, &user.password) {
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "message": "Invalid credentials.",
        })));
    }

    let token = create_jwt(&user.email, &services.settings.server_id, TOKEN_MAX_AGE)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Logged in as {}", user.username),
        "token": token,
        "user": user.to_public_value(),
    })))
}

/// current user details
#[get("/user")]
pub async fn get_user_details(
    req: HttpRequest,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "User details fetched successfully.",
        "user": user.to_public_value(),
    })))
}

/// edit the current user's display name
///
/// The email stays immutable; it is the token subject.
#[post("/user/edit")]
pub async fn edit_user_details(
    req: HttpRequest,
    body: web::Json<EditUserRequest>,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let username = body
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::validation("Username is required."))?;

    let updated = UserTable::update_username(user.id, username)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "User details updated successfully.",
        "user": updated.to_public_value(),
    })))
}

/// upload a new profile picture
#[post("/user/picture")]
pub async fn edit_profile_picture(
    req: HttpRequest,
    mut payload: Multipart,
    services: web::Data<Services>,
) -> Result<HttpResponse, ApiError> {
    let user = require_user(&req, &services.settings.server_id).await?;

    let (photo, _) = read_upload_form(&mut payload).await?;
    let photo = photo
        .filter(|p| !p.bytes.is_empty())
        .ok_or_else(|| ApiError::validation("No image uploaded"))?;

    let paths = Paths::get()?;
    let stored = save_upload(
        &paths.uploads_dir(),
        user.id,
        photo.filename.as_deref(),
        photo.content_type.as_deref(),
        &photo.bytes,
    )
    .map_err(|e| ApiError::Internal(format!("Error uploading image: {}", e)))?;

    let updated = UserTable::update_picture(user.id, &stored.to_string_lossy())
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": "Profile picture updated successfully.",
        "user": updated.to_public_value(),
    })))
}

/// configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(get_user_details)
        .service(edit_user_details)
        .service(edit_profile_picture);
}
