//! Database module for MoodTunes
//!
//! This module handles all database operations using SQLx with SQLite.
//! Every table operation that touches user-owned rows is parameterized by
//! the acting user id, never exposed as a raw-id lookup.

mod engine;
pub mod tables;

pub use engine::{setup_sqlite, DbEngine};
pub use tables::*;

#[cfg(test)]
pub(crate) use engine::setup_test_db;
