// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP client for the remote thumbnail scoring service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ScoringConfig;
use crate::error::RemoteFailure;
use crate::intake::AnalysisRequest;
use crate::model::{AnalysisResult, AnalyzeResponse};
use crate::{Result, ThumbscoreError};

/// Multipart field carrying the image
pub const FILE_FIELD: &str = "file";

/// Anything that can turn an image into a scored result
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn score(
        &self,
        request: AnalysisRequest,
    ) -> std::result::Result<AnalysisResult, RemoteFailure>;
}

/// Reply of `GET /health`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

/// Reply of `GET /metrics`
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceMetrics {
    pub total_analyses: u64,
    pub average_score: f64,
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Scoring service client
pub struct ScoringClient {
    client: Client,
    base_url: String,
}

impl ScoringClient {
    /// Create a new scoring client
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()?;

        // Normalize URL
        let base_url = config
            .url
            .trim_end_matches('/')
            .trim_end_matches("/analyze")
            .to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if the scoring service is available
    pub async fn health_check(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);

        let response = self.client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                ThumbscoreError::ServiceUnavailable(format!(
                    "Cannot connect to scoring service at {}: {}",
                    self.base_url, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(ThumbscoreError::ServiceUnavailable(format!(
                "Scoring service returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    /// Usage counters kept by the service
    pub async fn service_metrics(&self) -> Result<ServiceMetrics> {
        let url = format!("{}/metrics", self.base_url);

        let response = self.client
            .get(&url)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ThumbscoreError::ServiceUnavailable(format!(
                "Scoring service returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    fn form(request: AnalysisRequest) -> std::result::Result<Form, RemoteFailure> {
        let part = Part::bytes(request.bytes.to_vec())
            .file_name(request.file_name)
            .mime_str(&request.media_type)
            .map_err(|e| RemoteFailure::Unavailable(format!("could not build request: {}", e)))?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[async_trait]
impl ScoringService for ScoringClient {
    async fn score(
        &self,
        request: AnalysisRequest,
    ) -> std::result::Result<AnalysisResult, RemoteFailure> {
        let url = format!("{}/analyze", self.base_url);
        debug!(
            file = %request.file_name,
            size = request.bytes.len(),
            "sending image to scoring service"
        );

        let form = Self::form(request)?;
        let response = self.client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemoteFailure::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteFailure::Rejected { status: status.as_u16() });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteFailure::Unavailable(e.to_string()))?;
        decode_response(&body)
    }
}

/// Decode and normalize the body of a successful `/analyze` response
pub fn decode_response(body: &[u8]) -> std::result::Result<AnalysisResult, RemoteFailure> {
    let response: AnalyzeResponse =
        serde_json::from_slice(body).map_err(|e| RemoteFailure::Malformed(e.to_string()))?;
    Ok(response.analysis.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ScoringConfig {
            url: "http://localhost:8000/analyze/".to_string(),
            timeout_secs: 5,
        };
        let client = ScoringClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");

        let config = ScoringConfig {
            url: "https://score.example.com/".to_string(),
            timeout_secs: 5,
        };
        assert_eq!(ScoringClient::new(&config).unwrap().base_url(), "https://score.example.com");
    }

    #[test]
    fn test_decode_malformed_body() {
        assert!(matches!(decode_response(b"<html>oops</html>"), Err(RemoteFailure::Malformed(_))));
        let detail_only = decode_response(br#"{"detail": "nope"}"#);
        assert!(matches!(detail_only, Err(RemoteFailure::Malformed(_))));
    }

    #[test]
    fn test_decode_success_body() {
        let result = decode_response(
            br#"{"success": true, "analysis": {"score": 72.4, "breakdown": {
                "visual_impact": 70, "clarity": 71, "contrast": 72,
                "color_harmony": 73, "composition": 74, "text_readability": 75},
                "suggestions": []}}"#,
        )
        .unwrap();
        assert_eq!(result.score, 72.4);
        assert_eq!(result.breakdown.composition, 74.0);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_form_rejects_unparseable_media_type() {
        let request = AnalysisRequest {
            file_name: "a.png".to_string(),
            media_type: "garbage".to_string(),
            bytes: std::sync::Arc::from(vec![1u8]),
        };
        assert!(matches!(ScoringClient::form(request), Err(RemoteFailure::Unavailable(_))));
    }
}
