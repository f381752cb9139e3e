//! Filesystem helpers for uploaded photos

use anyhow::Result;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Write an uploaded photo to the uploads directory under a unique name
///
/// The extension comes from the client filename when present, otherwise
/// from the declared content type, defaulting to jpg.
pub fn save_upload(
    uploads_dir: &Path,
    userid: i64,
    filename: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<PathBuf> {
    let ext = filename
        .and_then(|f| Path::new(f).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .or_else(|| {
            content_type
                .and_then(mime_guess::get_mime_extensions_str)
                .and_then(|exts| exts.first())
                .map(|e| e.to_string())
        })
        .unwrap_or_else(|| "jpg".to_string());

    let name = format!("{}_{}.{}", userid, Uuid::new_v4(), ext);
    let path = uploads_dir.join(name);

    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_upload_uses_filename_extension() {
        let dir = TempDir::new().unwrap();
        let path = save_upload(dir.path(), 1, Some("face.PNG"), None, b"img").unwrap();

        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&path).unwrap(), b"img");
    }

    #[test]
    fn test_save_upload_falls_back_to_jpg() {
        let dir = TempDir::new().unwrap();
        let path = save_upload(dir.path(), 1, None, None, b"img").unwrap();

        assert_eq!(path.extension().unwrap(), "jpg");
    }

    #[test]
    fn test_save_upload_names_are_unique() {
        let dir = TempDir::new().unwrap();
        let a = save_upload(dir.path(), 1, Some("a.jpg"), None, b"x").unwrap();
        let b = save_upload(dir.path(), 1, Some("a.jpg"), None, b"y").unwrap();

        assert_ne!(a, b);
    }
}
