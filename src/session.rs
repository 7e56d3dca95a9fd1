// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! In-memory statistics for the current session

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters over every analysis resolved in this session. Never persisted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub total_analyses: u64,
    /// Analyses resolved with the fallback result
    pub degraded_analyses: u64,
    pub average_score: f64,
    pub last_resolved_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    score_sum: f64,
}

impl SessionStats {
    pub fn record(&mut self, score: f64, degraded: bool) {
        self.total_analyses += 1;
        if degraded {
            self.degraded_analyses += 1;
        }
        self.score_sum += score;
        self.average_score = round_tenth(self.score_sum / self.total_analyses as f64);
        self.last_resolved_at = Some(Utc::now());
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
