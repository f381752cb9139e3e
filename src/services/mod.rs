//! External collaborators consumed by the core
//!
//! Both collaborators are reachable through narrow interfaces so the capture
//! workflow never depends on a concrete provider.

pub mod classifier;
pub mod youtube;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::config::Settings;
use crate::models::{CandidateSong, Detection};

pub use classifier::EmotionApiClient;
pub use youtube::YoutubeClient;

/// Maps a stored photo to a dominant emotion label and a face bounding box
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image_path: &Path) -> Result<Detection>;
}

/// Maps an (emotion, language) query to ranked media results
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn search(&self, emotion: &str, language: &str) -> Result<Vec<CandidateSong>>;
}

/// Shared handler state: collaborators plus validated settings
pub struct Services {
    pub classifier: Box<dyn Classifier>,
    pub recommender: Box<dyn RecommendationSource>,
    pub settings: Settings,
}

impl Services {
    /// Build the production collaborators from validated settings
    pub fn new(settings: Settings) -> Self {
        Self {
            classifier: Box::new(EmotionApiClient::new(settings.classifier_url.clone())),
            recommender: Box::new(YoutubeClient::new(
                settings.youtube_api_key.clone(),
                settings.max_results,
            )),
            settings,
        }
    }
}
