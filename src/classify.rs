// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Score-to-band classification used for presentation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest score classified as `Excellent`
pub const EXCELLENT_THRESHOLD: f64 = 85.0;
/// Lowest score classified as `Good`
pub const GOOD_THRESHOLD: f64 = 70.0;

/// Qualitative tier of a score. Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    NeedsImprovement,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::NeedsImprovement => "Needs improvement",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map any score to its band. Applies equally to overall and per-metric values.
///
/// Total over `f64`: NaN fails both comparisons and lands in
/// `NeedsImprovement`.
pub fn classify(score: f64) -> ScoreBand {
    if score >= EXCELLENT_THRESHOLD {
        ScoreBand::Excellent
    } else if score >= GOOD_THRESHOLD {
        ScoreBand::Good
    } else {
        ScoreBand::NeedsImprovement
    }
}
