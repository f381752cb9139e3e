//! Feedback models

use serde::{Deserialize, Serialize};

/// User-submitted feedback about the application
///
/// Starts unpublished; the owner can toggle publication to put it on the
/// public wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feedback {
    /// Database ID
    pub id: i64,
    /// Owner user ID
    #[serde(skip_serializing)]
    pub userid: i64,
    pub message: String,
    pub published: bool,
    pub created_at: String,
}

/// A published feedback entry as shown on the public wall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedFeedback {
    pub id: i64,
    pub username: String,
    pub message: String,
    pub created_at: String,
}
