//! Human Feedback Gate
//!
//! Decides after each successful pass whether the run must pause for
//! feedback before evaluating stop conditions. The decision is a pure
//! function of the iteration state; waiting on the provider happens in
//! the controller so cancellation is handled in one place.

use slideforge_domain::{AnalysisResult, BusinessContext, ReviewResult, Urgency};
use tracing::debug;

/// From this iteration on, a still-unconvincing confidence warrants a
/// human look
const FEEDBACK_ITERATION_FLOOR: u32 = 2;

/// Below this confidence the iteration counts as unconvincing
const FEEDBACK_CONFIDENCE_CEILING: f64 = 75.0;

/// Whether this iteration must pause for feedback.
///
/// The gate opens when any of the following holds:
/// - the loop is on its second or later iteration and confidence is
///   still under 75
/// - the request is critical-urgency
/// - the audience includes an executive decision maker
/// - the dataset's quality score is low
pub(super) fn needs_feedback(
    analysis: &AnalysisResult,
    review: &ReviewResult,
    iteration: u32,
    context: &BusinessContext,
) -> bool {
    let unconvincing = iteration >= FEEDBACK_ITERATION_FLOOR
        && review.confidence < FEEDBACK_CONFIDENCE_CEILING;
    let critical = context.urgency == Urgency::Critical;
    let executive = context.has_executive_audience();
    let low_quality = analysis.quality.is_low();

    let fires = unconvincing || critical || executive || low_quality;
    if fires {
        debug!(
            iteration,
            unconvincing, critical, executive, low_quality, "feedback gate fired"
        );
    }
    fires
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideforge_domain::DataQuality;

    fn analysis(quality: f64) -> AnalysisResult {
        AnalysisResult {
            descriptive: vec![],
            correlations: vec![],
            trends: vec![],
            outliers: vec![],
            insights: vec![],
            chart_hints: vec![],
            quality: DataQuality {
                score: quality,
                issues: vec![],
            },
        }
    }

    fn review(confidence: f64) -> ReviewResult {
        ReviewResult {
            analysis_quality: 80.0,
            business_relevance: 80.0,
            insight_depth: 80.0,
            recommendation_strength: 80.0,
            confidence,
            improvement_areas: vec![],
            suggested_next_steps: vec![],
        }
    }

    #[test]
    fn test_gate_closed_for_routine_first_iteration() {
        let context = BusinessContext::new("SaaS");
        assert!(!needs_feedback(&analysis(90.0), &review(60.0), 1, &context));
    }

    #[test]
    fn test_low_confidence_opens_gate_from_second_iteration() {
        let context = BusinessContext::new("SaaS");
        assert!(needs_feedback(&analysis(90.0), &review(60.0), 2, &context));
        assert!(!needs_feedback(&analysis(90.0), &review(80.0), 2, &context));
    }

    #[test]
    fn test_critical_urgency_always_opens_gate() {
        let context = BusinessContext::new("SaaS").with_urgency(Urgency::Critical);
        assert!(needs_feedback(&analysis(90.0), &review(95.0), 1, &context));
    }

    #[test]
    fn test_executive_audience_opens_gate() {
        let context = BusinessContext::new("SaaS")
            .with_decision_makers(vec!["Jordan Diaz, CFO".to_string()]);
        assert!(needs_feedback(&analysis(90.0), &review(95.0), 1, &context));
    }

    #[test]
    fn test_low_data_quality_opens_gate() {
        let context = BusinessContext::new("SaaS");
        assert!(needs_feedback(&analysis(50.0), &review(95.0), 1, &context));
    }
}
