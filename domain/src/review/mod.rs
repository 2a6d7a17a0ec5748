//! Insight review results

use serde::{Deserialize, Serialize};

/// Per-dimension quality assessment produced by the Insight Reviewer.
///
/// All scores are 0-100. One per iteration, immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub analysis_quality: f64,
    pub business_relevance: f64,
    pub insight_depth: f64,
    pub recommendation_strength: f64,
    /// Aggregate confidence, the base for the iteration's confidence score
    pub confidence: f64,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub suggested_next_steps: Vec<String>,
}

impl ReviewResult {
    /// Clamp all scores into [0, 100].
    ///
    /// Out-of-range reviewer scores are clamped rather than rejected;
    /// rejecting would turn a usable response into a retry for no benefit.
    pub fn clamped(mut self) -> Self {
        for score in [
            &mut self.analysis_quality,
            &mut self.business_relevance,
            &mut self.insight_depth,
            &mut self.recommendation_strength,
            &mut self.confidence,
        ] {
            *score = score.clamp(0.0, 100.0);
        }
        self
    }
}
