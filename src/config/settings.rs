//! Application settings for MoodTunes
//!
//! Settings are stored in settings.json and may be overridden by environment
//! variables on every startup. External API credentials are never compiled in.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::Paths;

/// Environment variable carrying the YouTube Data API key
pub const YOUTUBE_API_KEY_ENV: &str = "MOODTUNES_YOUTUBE_API_KEY";

/// Environment variable carrying the emotion classifier base URL
pub const CLASSIFIER_URL_ENV: &str = "MOODTUNES_CLASSIFIER_URL";

/// Application settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Server ID used for the JWT secret and password salt
    #[serde(default)]
    pub server_id: String,

    /// YouTube Data API v3 key (env-sourced secret)
    #[serde(default)]
    pub youtube_api_key: String,

    /// Base URL of the emotion classification service
    #[serde(default = "default_classifier_url")]
    pub classifier_url: String,

    /// Maximum recommendations fetched per detection
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_id: String::new(),
            youtube_api_key: String::new(),
            classifier_url: default_classifier_url(),
            max_results: default_max_results(),
        }
    }
}

impl Settings {
    /// Load settings from file, applying environment overrides
    pub fn load() -> Result<Self> {
        let paths = Paths::get()?;
        let settings_path = paths.settings_path();

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .context("Failed to read settings file")?;
            serde_json::from_str(&content).context("Failed to parse settings file")?
        } else {
            let settings = Self::default();
            settings.save()?;
            settings
        };

        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        let paths = Paths::get()?;
        let settings_path = paths.settings_path();

        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(&settings_path, content).context("Failed to write settings file")?;

        Ok(())
    }

    /// Env vars win over the settings file so docker users can change
    /// credentials between restarts and have it take effect.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(YOUTUBE_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.youtube_api_key = key.trim().to_string();
            }
        }
        if let Ok(url) = std::env::var(CLASSIFIER_URL_ENV) {
            if !url.trim().is_empty() {
                self.classifier_url = url.trim().to_string();
            }
        }
    }

    /// Validate startup requirements, failing fast on missing secrets
    pub fn validate(&self) -> Result<()> {
        if self.youtube_api_key.is_empty() {
            bail!(
                "YouTube API key is not configured. Set {} or add it to settings.json",
                YOUTUBE_API_KEY_ENV
            );
        }
        if self.classifier_url.is_empty() {
            bail!(
                "Emotion classifier URL is not configured. Set {} or add it to settings.json",
                CLASSIFIER_URL_ENV
            );
        }
        Ok(())
    }
}

fn default_classifier_url() -> String {
    "http://127.0.0.1:5005".to_string()
}

fn default_max_results() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_results, 10);
        assert!(settings.youtube_api_key.is_empty());
        assert!(!settings.classifier_url.is_empty());
    }

    #[test]
    fn test_validate_rejects_missing_api_key() {
        let settings = Settings::default();
        assert!(settings.validate().is_err());

        let settings = Settings {
            youtube_api_key: "key".to_string(),
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_serialization() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings.max_results, deserialized.max_results);
    }
}
