//! Configuration module for MoodTunes
//!
//! This module contains the application settings and path management.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{Settings, CLASSIFIER_URL_ENV, YOUTUBE_API_KEY_ENV};
