//! REST API routes for MoodTunes

pub mod auth;
pub mod emotion;
pub mod feedback;
pub mod playlist;

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest};
use futures::StreamExt;

use crate::core::capture::UploadedPhoto;
use crate::db::UserTable;
use crate::error::ApiError;
use crate::models::User;
use crate::utils::auth::resolve_identity;

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Auth routes
        .service(web::scope("/auth").configure(auth::configure))
        // Emotion detection routes
        .service(web::scope("/emotion").configure(emotion::configure))
        // Feedback routes
        .service(web::scope("/feedback").configure(feedback::configure))
        // Playlist routes
        .service(web::scope("/playlists").configure(playlist::configure));
}

/// Resolve the Authorization header into the acting user
///
/// Token verification stays pure; only the subject lookup touches the
/// database, and an unknown subject becomes a user not-found error.
pub(crate) async fn require_user(req: &HttpRequest, secret: &str) -> Result<User, ApiError> {
    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let email = resolve_identity(header, secret)?;

    match UserTable::get_by_email(&email).await? {
        Some(user) => Ok(user),
        None => Err(ApiError::UserNotFound),
    }
}

/// Collect the `image` and `language` fields of a multipart upload
///
/// A stream error anywhere in the payload fails the whole request; bytes
/// are never silently dropped and a truncated upload is never stored.
pub(crate) async fn read_upload_form(
    payload: &mut Multipart,
) -> Result<(Option<UploadedPhoto>, Option<String>), ApiError> {
    let mut photo: Option<UploadedPhoto> = None;
    let mut language: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|_| ApiError::validation("Invalid multipart payload."))?;

        let disp = field.content_disposition().clone();
        let name = disp.get_name().map(|s| s.to_string()).unwrap_or_default();
        let content_type = field.content_type().map(|ct| ct.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|_| ApiError::validation("Invalid multipart payload."))?;
            bytes.extend_from_slice(&data);
        }

        match name.as_str() {
            "image" => {
                photo = Some(UploadedPhoto {
                    filename: disp.get_filename().map(|s| s.to_string()),
                    content_type,
                    bytes,
                });
            }
            "language" => {
                language = Some(String::from_utf8_lossy(&bytes).trim().to_string());
            }
            _ => {}
        }
    }

    Ok((photo, language))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::error::PayloadError;
    use actix_web::http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use actix_web::web::Bytes;
    use futures::stream;

    const BOUNDARY: &str = "moodtunesformboundary";

    fn headers() -> HeaderMap {
        let mut map = HeaderMap::new();
        let value = format!("multipart/form-data; boundary={}", BOUNDARY);
        map.insert(CONTENT_TYPE, HeaderValue::from_str(&value).unwrap());
        map
    }

    fn form_body() -> String {
        format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"language\"\r\n\r\n\
             english\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"image\"; filename=\"face.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\n\
             rawbytes\r\n\
             --{b}--\r\n",
            b = BOUNDARY
        )
    }

    #[tokio::test]
    async fn test_read_upload_form_extracts_fields() {
        let chunks = vec![Ok::<_, PayloadError>(Bytes::from(form_body()))];
        let mut payload = Multipart::new(&headers(), stream::iter(chunks));

        let (photo, language) = read_upload_form(&mut payload).await.unwrap();

        let photo = photo.unwrap();
        assert_eq!(language.as_deref(), Some("english"));
        assert_eq!(photo.filename.as_deref(), Some("face.jpg"));
        assert_eq!(photo.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(photo.bytes, b"rawbytes");
    }

    #[tokio::test]
    async fn test_read_upload_form_surfaces_stream_errors() {
        // the payload breaks mid-upload: the request must fail, not store
        // a truncated image
        let body = form_body();
        let half = body.len() / 2;
        let chunks: Vec<Result<Bytes, PayloadError>> = vec![
            Ok(Bytes::copy_from_slice(&body.as_bytes()[..half])),
            Err(PayloadError::Incomplete(None)),
        ];
        let mut payload = Multipart::new(&headers(), stream::iter(chunks));

        let err = read_upload_form(&mut payload).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid multipart payload.");
    }
}
