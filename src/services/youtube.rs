//! YouTube Data API v3 client for music recommendations

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::RecommendationSource;
use crate::models::CandidateSong;

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Search API response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(default)]
    error: Option<SearchError>,
}

#[derive(Debug, Deserialize)]
struct SearchError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    high: Option<Thumbnail>,
    #[serde(default)]
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// Client for the YouTube search endpoint
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    max_results: u32,
}

impl YoutubeClient {
    pub fn new(api_key: String, max_results: u32) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            max_results,
        }
    }
}

#[async_trait]
impl RecommendationSource for YoutubeClient {
    async fn search(&self, emotion: &str, language: &str) -> Result<Vec<CandidateSong>> {
        let query = format!("{} music playlist {}", emotion, language);

        let resp = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("q", query.as_str()),
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", &self.max_results.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await?;

        let body: SearchResponse = resp.json().await?;

        if let Some(error) = body.error {
            return Err(anyhow!(error
                .message
                .unwrap_or_else(|| "YouTube API error".to_string())));
        }

        Ok(into_candidates(body.items))
    }
}

/// Items without a video id (channels, playlists) are skipped
fn into_candidates(items: Vec<SearchItem>) -> Vec<CandidateSong> {
    items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let thumbnail = item
                .snippet
                .thumbnails
                .high
                .or(item.snippet.thumbnails.default)?;

            Some(CandidateSong {
                title: item.snippet.title,
                video_url: format!("https://www.youtube.com/watch?v={}", video_id),
                thumbnail: thumbnail.url,
            })
        })
        .collect()
}
