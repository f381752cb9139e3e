//! Utility modules for MoodTunes

pub mod auth;
pub mod filesystem;
