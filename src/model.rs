// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Analysis result model and normalization of scoring payloads

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Lowest score any value is clamped to
pub const MIN_SCORE: f64 = 0.0;
/// Highest score any value is clamped to
pub const MAX_SCORE: f64 = 100.0;

/// One of the six visual-quality dimensions of a thumbnail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    VisualImpact,
    Clarity,
    Contrast,
    ColorHarmony,
    Composition,
    TextReadability,
}

impl Metric {
    /// All metrics in display order
    pub const ALL: [Metric; 6] = [
        Metric::VisualImpact,
        Metric::Clarity,
        Metric::Contrast,
        Metric::ColorHarmony,
        Metric::Composition,
        Metric::TextReadability,
    ];

    /// Key used by the scoring service
    pub fn key(self) -> &'static str {
        match self {
            Metric::VisualImpact => "visual_impact",
            Metric::Clarity => "clarity",
            Metric::Contrast => "contrast",
            Metric::ColorHarmony => "color_harmony",
            Metric::Composition => "composition",
            Metric::TextReadability => "text_readability",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::VisualImpact => "Visual impact",
            Metric::Clarity => "Clarity",
            Metric::Contrast => "Contrast",
            Metric::ColorHarmony => "Color harmony",
            Metric::Composition => "Composition",
            Metric::TextReadability => "Text readability",
        }
    }
}

/// Per-dimension sub-scores, each in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBreakdown {
    pub visual_impact: f64,
    pub clarity: f64,
    pub contrast: f64,
    pub color_harmony: f64,
    pub composition: f64,
    pub text_readability: f64,
}

impl MetricBreakdown {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::VisualImpact => self.visual_impact,
            Metric::Clarity => self.clarity,
            Metric::Contrast => self.contrast,
            Metric::ColorHarmony => self.color_harmony,
            Metric::Composition => self.composition,
            Metric::TextReadability => self.text_readability,
        }
    }

    /// Iterate `(metric, value)` pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// A complete, immutable scoring outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: f64,
    pub breakdown: MetricBreakdown,
    pub suggestions: Vec<String>,
}

/// Top-level body of a successful `/analyze` response
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisPayload,
}

/// The `analysis` object as sent by the service. Extra fields are ignored.
#[derive(Debug, Deserialize)]
pub struct AnalysisPayload {
    pub score: f64,
    #[serde(default)]
    pub breakdown: BreakdownPayload,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BreakdownPayload {
    pub visual_impact: Option<f64>,
    pub clarity: Option<f64>,
    pub contrast: Option<f64>,
    pub color_harmony: Option<f64>,
    pub composition: Option<f64>,
    pub text_readability: Option<f64>,
}

impl BreakdownPayload {
    fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::VisualImpact => self.visual_impact,
            Metric::Clarity => self.clarity,
            Metric::Contrast => self.contrast,
            Metric::ColorHarmony => self.color_harmony,
            Metric::Composition => self.composition,
            Metric::TextReadability => self.text_readability,
        }
    }
}

impl AnalysisPayload {
    /// Convert the wire payload into a complete result.
    ///
    /// Missing breakdown keys become `0.0`; every value is clamped into
    /// `[0, 100]`.
    pub fn normalize(self) -> AnalysisResult {
        let missing: Vec<&str> = Metric::ALL
            .iter()
            .filter(|m| self.breakdown.value(**m).is_none())
            .map(|m| m.key())
            .collect();
        if !missing.is_empty() {
            warn!(?missing, "breakdown keys missing from scoring payload, defaulting to 0");
        }

        let value = |m: Metric| clamp_score(self.breakdown.value(m).unwrap_or(MIN_SCORE));
        let breakdown = MetricBreakdown {
            visual_impact: value(Metric::VisualImpact),
            clarity: value(Metric::Clarity),
            contrast: value(Metric::Contrast),
            color_harmony: value(Metric::ColorHarmony),
            composition: value(Metric::Composition),
            text_readability: value(Metric::TextReadability),
        };

        AnalysisResult {
            score: clamp_score(self.score),
            breakdown,
            suggestions: self.suggestions,
        }
    }
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        MIN_SCORE
    } else {
        value.clamp(MIN_SCORE, MAX_SCORE)
    }
}
