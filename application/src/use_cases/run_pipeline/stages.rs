//! The five stage agents
//!
//! Ordered document transformers: Summarizer → Outliner → Stylist →
//! Chart Specifier → Composer. Each call's response is validated against
//! its declared schema, and from the outline onwards the slide id
//! continuity invariant is enforced after every transformation.

use super::types::{RunPipelineError, StageFailure};
use crate::ports::progress::PipelineProgressNotifier;
use serde::de::DeserializeOwned;
use slideforge_domain::schema::decode;
use slideforge_domain::{
    AnalysisResult, BusinessContext, ChartedDocument, ComposedDocument, DroppedSlide,
    FeedbackRecord, OutlineDocument, Stage, StagePromptTemplate, StyledDocument, SummaryDocument,
    verify_slide_continuity,
};
use std::time::Duration;
use tracing::debug;

impl super::RunPipelineUseCase {
    /// Run all five stage agents in order, producing the composed deck.
    ///
    /// `prior` is the previous iteration's composed deck; when present the
    /// outliner refines it and must preserve its slide ids.
    /// `prior_feedback` is the feedback collected on that deck, embedded in
    /// the outliner prompt so corrections and priorities shape the revision.
    pub(super) async fn run_stages(
        &self,
        analysis: &AnalysisResult,
        context: &BusinessContext,
        prior: Option<&ComposedDocument>,
        prior_feedback: Option<&FeedbackRecord>,
        timeout: Duration,
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<ComposedDocument, RunPipelineError> {
        let summary: SummaryDocument = self
            .stage_document(
                Stage::Summarizer,
                &StagePromptTemplate::summarizer(analysis, context),
                timeout,
                progress,
            )
            .await?;

        let outline: OutlineDocument = self
            .stage_document(
                Stage::Outliner,
                &StagePromptTemplate::outliner(&summary, context, prior, prior_feedback),
                timeout,
                progress,
            )
            .await?;
        if let Some(prior) = prior {
            check_continuity(
                Stage::Outliner,
                &prior.slide_ids(),
                &outline.slide_ids(),
                &outline.dropped_slides,
            )?;
        }
        // Downstream stages must preserve whatever the outline settled on
        let mut expected = outline.slide_ids();

        let styled: StyledDocument = self
            .stage_document(
                Stage::Stylist,
                &StagePromptTemplate::stylist(&outline, context),
                timeout,
                progress,
            )
            .await?;
        check_continuity(
            Stage::Stylist,
            &expected,
            &styled.slide_ids(),
            &styled.dropped_slides,
        )?;
        expected = styled.slide_ids();

        let charted: ChartedDocument = self
            .stage_document(
                Stage::ChartSpecifier,
                &StagePromptTemplate::chart_specifier(&styled, analysis),
                timeout,
                progress,
            )
            .await?;
        check_continuity(
            Stage::ChartSpecifier,
            &expected,
            &charted.slide_ids(),
            &charted.dropped_slides,
        )?;
        expected = charted.slide_ids();

        let composed: ComposedDocument = self
            .stage_document(
                Stage::Composer,
                &StagePromptTemplate::composer(&charted, context),
                timeout,
                progress,
            )
            .await?;
        check_continuity(
            Stage::Composer,
            &expected,
            &composed.slide_ids(),
            &composed.dropped_slides,
        )?;

        debug!(slides = composed.slides.len(), "stage agents complete");
        Ok(composed)
    }

    /// One stage call: prompt, model, schema validation
    async fn stage_document<T: DeserializeOwned>(
        &self,
        stage: Stage,
        prompt: &str,
        timeout: Duration,
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<T, RunPipelineError> {
        progress.on_stage_start(stage);
        debug!(stage = stage.as_str(), "stage started");

        let response = self
            .call_model(prompt, timeout)
            .await
            .map_err(|cause| RunPipelineError::Stage { stage, cause })?;
        let document = decode::<T>(&response).map_err(|error| RunPipelineError::Stage {
            stage,
            cause: StageFailure::Response(error),
        })?;

        progress.on_stage_complete(stage);
        Ok(document)
    }
}

fn check_continuity(
    stage: Stage,
    expected: &[String],
    present: &[String],
    dropped: &[DroppedSlide],
) -> Result<(), RunPipelineError> {
    verify_slide_continuity(stage, expected, present, dropped)
        .map(|_| ())
        .map_err(|error| RunPipelineError::Stage {
            stage,
            cause: StageFailure::Response(error),
        })
}
