// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Thumbscore: thumbnail quality scoring client
//!
//! Takes an image from the user, asks a remote scoring service for an
//! assessment and exposes a normalized result (overall score, six-metric
//! breakdown, suggestions). When the service cannot answer, a fixed
//! fallback result is used instead of an error.

pub mod classify;
pub mod config;
pub mod error;
pub mod fallback;
pub mod intake;
pub mod model;
pub mod orchestrator;
pub mod preview;
pub mod scoring;
pub mod session;

pub use config::AppConfig;
pub use error::{RemoteFailure, Result, ThumbscoreError};
pub use orchestrator::{Orchestrator, OrchestratorState};
