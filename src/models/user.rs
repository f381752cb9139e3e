//! User model

use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Database ID
    pub id: i64,
    /// Unique email identity
    pub email: String,
    /// Display name
    pub username: String,
    /// Password hash
    #[serde(skip_serializing)]
    pub password: String,
    /// Stored profile picture path, empty until one is uploaded
    pub profile_picture: String,
    /// Registration timestamp
    pub date_joined: String,
}

impl User {
    /// Create a new user ready for insertion
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: 0,
            email,
            username,
            password: password_hash,
            profile_picture: String::new(),
            date_joined: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Public representation without credentials
    pub fn to_public_value(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "email": self.email,
            "username": self.username,
            "profile_picture": self.profile_picture,
            "date_joined": self.date_joined,
        })
    }
}
