// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Thumbscore

use thiserror::Error;

/// Result type alias for Thumbscore operations
pub type Result<T> = std::result::Result<T, ThumbscoreError>;

/// Thumbscore error types
#[derive(Error, Debug)]
pub enum ThumbscoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Scoring service not available: {0}")]
    ServiceUnavailable(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a remote scoring call did not produce a result.
///
/// Never surfaced to the presenter: the orchestrator logs it and
/// substitutes the fallback result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteFailure {
    /// The endpoint could not be reached (connect, timeout, broken body).
    #[error("scoring service unreachable: {0}")]
    Unavailable(String),

    /// The endpoint answered with a non-success status.
    #[error("scoring service rejected the request with status {status}")]
    Rejected { status: u16 },

    /// The endpoint answered 2xx but the body could not be decoded.
    #[error("scoring service sent a malformed payload: {0}")]
    Malformed(String),
}

impl RemoteFailure {
    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteFailure::Unavailable(_) => "unavailable",
            RemoteFailure::Rejected { .. } => "rejected",
            RemoteFailure::Malformed(_) => "malformed",
        }
    }
}
