//! Core workflows for MoodTunes

pub mod capture;
