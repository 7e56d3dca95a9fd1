// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Placeholder result used when the scoring service cannot answer.
//!
//! This is not an analysis of the submitted image. It is a fixed,
//! canonical result so that every `analyze` ends with something to show.
//! It must stay constant: same score, same breakdown, same suggestions in
//! the same order on every call.

use crate::model::{AnalysisResult, MetricBreakdown};

pub const FALLBACK_SCORE: f64 = 87.3;

pub const FALLBACK_BREAKDOWN: MetricBreakdown = MetricBreakdown {
    visual_impact: 89.5,
    clarity: 85.2,
    contrast: 91.8,
    color_harmony: 84.1,
    composition: 88.7,
    text_readability: 86.4,
};

pub const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "Increase the contrast between the subject and the background",
    "Use larger, bolder text so the title reads at small sizes",
    "Place the focal point on a rule-of-thirds intersection",
];

/// Build the fallback result
pub fn synthesize() -> AnalysisResult {
    AnalysisResult {
        score: FALLBACK_SCORE,
        breakdown: FALLBACK_BREAKDOWN,
        suggestions: FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
    }
}
