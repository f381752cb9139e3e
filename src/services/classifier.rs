//! HTTP client for the emotion classification service

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::Classifier;
use crate::models::{Detection, FaceRegion};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Classifier response body
#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    dominant_emotion: String,
    region: RegionBody,
}

#[derive(Debug, Deserialize)]
struct RegionBody {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

#[derive(Debug, Deserialize)]
struct AnalyzeError {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the external face analysis service
pub struct EmotionApiClient {
    client: Client,
    base_url: String,
}

impl EmotionApiClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client, base_url }
    }
}

#[async_trait]
impl Classifier for EmotionApiClient {
    async fn classify(&self, image_path: &Path) -> Result<Detection> {
        let bytes = tokio::fs::read(image_path).await?;

        let url = format!("{}/analyze", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<AnalyzeError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("classifier returned {}", status));
            return Err(anyhow!(message));
        }

        let body: AnalyzeResponse = resp.json().await?;

        Ok(Detection {
            emotion: body.dominant_emotion,
            region: FaceRegion {
                x: body.region.x,
                y: body.region.y,
                width: body.region.w,
                height: body.region.h,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_response_parsing() {
        let json = r#"{
            "dominant_emotion": "sad",
            "region": {"x": 10, "y": 20, "w": 100, "h": 120}
        }"#;

        let body: AnalyzeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.dominant_emotion, "sad");
        assert_eq!(body.region.w, 100);
    }
}
