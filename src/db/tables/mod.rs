//! Database table operations

mod feedback_table;
mod image_table;
mod playlist_table;
mod recommendation_table;
mod song_table;
mod user_table;

pub use feedback_table::FeedbackTable;
pub use image_table::ImageTable;
pub use playlist_table::PlaylistTable;
pub use recommendation_table::RecommendationTable;
pub use song_table::SongTable;
pub use user_table::UserTable;
