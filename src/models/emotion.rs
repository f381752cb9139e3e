//! Emotion detection models

use serde::{Deserialize, Serialize};

/// Face bounding box returned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Result of classifying one photo
#[derive(Debug, Clone)]
pub struct Detection {
    /// Dominant emotion label as returned by the classifier (lowercase)
    pub emotion: String,
    /// Bounding box of the detected face
    pub region: FaceRegion,
}

/// A photo uploaded for emotion detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    /// Database ID
    pub id: i64,
    /// Owner user ID
    pub userid: i64,
    /// Stored file path
    pub path: String,
    /// Upload timestamp
    pub created_at: String,
}

/// One candidate song returned by the external recommendation source,
/// not yet persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSong {
    pub title: String,
    pub video_url: String,
    pub thumbnail: String,
}

/// One recommended song produced from a detection
///
/// Immutable once created; playlist composition copies its fields rather
/// than referencing the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Database ID
    pub id: i64,
    /// Owner user ID
    #[serde(skip_serializing)]
    pub userid: i64,
    /// Source uploaded image ID
    #[serde(skip_serializing)]
    pub image_id: i64,
    pub song_title: String,
    pub song_url: String,
    pub song_thumbnail: String,
}

/// Normalize an emotion label for display ("sad" -> "Sad")
pub fn capitalize_emotion(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_emotion() {
        assert_eq!(capitalize_emotion("sad"), "Sad");
        assert_eq!(capitalize_emotion("Happy"), "Happy");
        assert_eq!(capitalize_emotion(""), "");
    }

    #[test]
    fn test_recommendation_serialization_hides_owner() {
        let rec = Recommendation {
            id: 1,
            userid: 7,
            image_id: 3,
            song_title: "Sad Song".to_string(),
            song_url: "http://v/1".to_string(),
            song_thumbnail: "http://t/1".to_string(),
        };
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["song_title"], "Sad Song");
        assert!(value.get("userid").is_none());
        assert!(value.get("image_id").is_none());
    }
}
