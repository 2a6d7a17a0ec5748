//! Insight Reviewer call
//!
//! One model call per iteration that scores the analysis against the
//! business context. The reviewer sees the recent history so it can judge
//! whether successive iterations are actually improving.

use super::types::{RunPipelineError, StageFailure};
use slideforge_domain::schema::decode;
use slideforge_domain::{
    AnalysisResult, BusinessContext, IterationRecord, ReviewResult, StagePromptTemplate,
};
use std::time::Duration;
use tracing::debug;

impl super::RunPipelineUseCase {
    /// Score the analysis; out-of-range reviewer scores are clamped into
    /// [0, 100] rather than rejected.
    pub(super) async fn review_analysis(
        &self,
        analysis: &AnalysisResult,
        context: &BusinessContext,
        history: &[IterationRecord],
        timeout: Duration,
    ) -> Result<ReviewResult, RunPipelineError> {
        let prompt = StagePromptTemplate::reviewer(analysis, context, history);
        let response = self
            .call_model(&prompt, timeout)
            .await
            .map_err(|cause| RunPipelineError::Review { cause })?;

        let review: ReviewResult = decode(&response).map_err(|error| RunPipelineError::Review {
            cause: StageFailure::Response(error),
        })?;
        let review = review.clamped();
        debug!(
            confidence = review.confidence,
            analysis_quality = review.analysis_quality,
            improvement_areas = review.improvement_areas.len(),
            "insight review complete"
        );
        Ok(review)
    }
}
