// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Thumbscore

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{Result, ThumbscoreError};

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Remote scoring service settings
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// File intake policy
    #[serde(default)]
    pub intake: IntakeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScoringConfig {
    /// Base address of the scoring service; `/analyze` is appended
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct IntakeConfig {
    /// Upper bound on accepted file size in bytes. `None` accepts any size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<u64>,
}

fn default_url() -> String { "http://localhost:8000".to_string() }
fn default_timeout() -> u64 { 30 }

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ScoringConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| ThumbscoreError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that serde cannot express
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.scoring.url).map_err(|e| {
            ThumbscoreError::Config(format!("Invalid scoring url {:?}: {}", self.scoring.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ThumbscoreError::Config(format!(
                "Scoring url must use http or https, got {}",
                url.scheme()
            )));
        }
        if self.scoring.timeout_secs == 0 {
            return Err(ThumbscoreError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.intake.max_bytes == Some(0) {
            return Err(ThumbscoreError::Config("max_bytes must be greater than zero".to_string()));
        }
        Ok(())
    }
}
