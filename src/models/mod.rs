//! Data models for MoodTunes
//!
//! This module contains all the core data structures used throughout the application.

mod emotion;
mod feedback;
mod playlist;
mod user;

pub use emotion::{
    capitalize_emotion, CandidateSong, Detection, FaceRegion, Recommendation, UploadedImage,
};
pub use feedback::{Feedback, PublishedFeedback};
pub use playlist::{Playlist, PlaylistSong};
pub use user::User;
