//! Run Pipeline use case
//!
//! Orchestrates the bounded generation loop. Each iteration runs:
//!
//! | Step                     | Collaborator        |
//! |--------------------------|---------------------|
//! | 1. Tabular Analysis      | domain (pure)       |
//! | 2. Insight Review        | LLM gateway         |
//! | 3. Stage Agents (a-e)    | LLM gateway         |
//! | 4. Human Feedback Gate   | feedback provider   |
//! | 5. Stop Evaluation       | this controller     |
//!
//! The analysis is computed once per run (the dataset never changes
//! between iterations); everything downstream of it can vary because the
//! reviewer sees the accumulated history and the outliner refines the
//! previous iteration's deck.
//!
//! Stop conditions are evaluated in a fixed order after every usable
//! iteration: confidence threshold, then iteration budget, then explicit
//! approval. Failed iterations consume the per-iteration retry budget;
//! when it runs out the controller falls back to the best earlier result
//! rather than discarding completed work.

mod gate;
mod reviewer;
mod stages;
mod types;

pub use types::{
    PipelineParams, RunPipelineError, RunPipelineInput, RunPipelineOutput, StageFailure,
    StopReason,
};

use crate::ports::feedback::FeedbackProvider;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{NoProgress, PipelineProgressNotifier};
use slideforge_domain::{
    AnalysisResult, ComposedDocument, IterationRecord, StagePromptTemplate, adjust_confidence,
    analyze, assemble, best_record,
};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Check if cancellation has been requested.
///
/// Returns `Err(RunPipelineError::Cancelled)` if the token exists and is
/// cancelled.
fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), RunPipelineError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(RunPipelineError::Cancelled);
    }
    Ok(())
}

/// Use case for running the full generation pipeline
#[derive(Clone)]
pub struct RunPipelineUseCase {
    pub(super) gateway: Arc<dyn LlmGateway>,
    pub(super) feedback: Arc<dyn FeedbackProvider>,
    pub(super) cancellation_token: Option<CancellationToken>,
}

impl RunPipelineUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, feedback: Arc<dyn FeedbackProvider>) -> Self {
        Self {
            gateway,
            feedback,
            cancellation_token: None,
        }
    }

    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run the pipeline without progress reporting
    pub async fn execute(
        &self,
        input: RunPipelineInput,
    ) -> Result<RunPipelineOutput, RunPipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Run the pipeline, reporting progress through the notifier
    pub async fn execute_with_progress(
        &self,
        input: RunPipelineInput,
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<RunPipelineOutput, RunPipelineError> {
        let params = input.params.clone();
        info!(
            run_id = %input.run_id,
            gateway = %self.gateway.describe(),
            max_iterations = params.max_iterations,
            confidence_threshold = params.confidence_threshold,
            "pipeline run started"
        );

        // Invalid input is fatal before any iteration starts
        let analysis = analyze(&input.dataset)?;

        let mut history: Vec<IterationRecord> = Vec::new();
        let mut stop: Option<StopReason> = None;

        'run: for iteration in 1..=params.max_iterations {
            progress.on_iteration_start(iteration, params.max_iterations);
            let mut retries_left = params.stage_retry_budget;

            let record = loop {
                check_cancelled(&self.cancellation_token)?;

                match self
                    .run_iteration(iteration, &input, &analysis, &history, progress)
                    .await
                {
                    Ok(record) => break record,
                    Err(error) if error.is_retryable() && retries_left > 0 => {
                        retries_left -= 1;
                        warn!(
                            iteration,
                            error = %error,
                            retries_left,
                            "iteration attempt failed, retrying"
                        );
                    }
                    Err(error) if error.is_retryable() => {
                        warn!(iteration, error = %error, "retry budget exhausted");
                        history.push(IterationRecord::failed(
                            iteration,
                            analysis.clone(),
                            error.to_string(),
                        ));
                        if best_record(&history).is_some() {
                            stop = Some(StopReason::BestEffort);
                            break 'run;
                        }
                        return Err(RunPipelineError::PipelineFailed {
                            last_error: error.to_string(),
                        });
                    }
                    Err(error) => return Err(error),
                }
            };

            let confidence = record.confidence;
            let approved = record.feedback.as_ref().is_some_and(|f| f.is_approved());
            progress.on_iteration_complete(iteration, confidence);
            info!(iteration, confidence, approved, "iteration complete");
            history.push(record);

            // Stop conditions, in precedence order
            if confidence >= params.confidence_threshold {
                stop = Some(StopReason::ConfidenceReached);
                break;
            }
            if iteration >= params.max_iterations {
                stop = Some(StopReason::MaxIterations);
                break;
            }
            if approved {
                stop = Some(StopReason::Approved);
                break;
            }
        }

        // The loop always sets a reason before breaking; the iteration
        // budget is the conservative default should that ever change.
        let stop_reason = stop.unwrap_or(StopReason::MaxIterations);

        let basis = match stop_reason {
            StopReason::BestEffort => best_record(&history),
            _ => history.iter().rev().find(|r| r.is_success()),
        }
        .ok_or_else(|| RunPipelineError::PipelineFailed {
            last_error: "no usable iteration".to_string(),
        })?;
        let composed = basis
            .document
            .as_ref()
            .ok_or_else(|| RunPipelineError::PipelineFailed {
                last_error: "usable iteration carries no document".to_string(),
            })?;

        let iterations = history.last().map(|r| r.index).unwrap_or(0);
        let confidence = basis.confidence;
        let document = assemble(composed, confidence, iterations, &input.run_id);

        progress.on_run_complete(iterations, confidence);
        info!(
            run_id = %input.run_id,
            stop_reason = %stop_reason,
            iterations,
            confidence,
            slides = document.slides.len(),
            "pipeline run finished"
        );

        Ok(RunPipelineOutput {
            run_id: input.run_id,
            document,
            history,
            stop_reason,
            confidence,
            iterations,
        })
    }

    /// One full pass: review, stage agents, and (when the gate fires) the
    /// feedback wait. Returns a usable record or the first error.
    async fn run_iteration(
        &self,
        iteration: u32,
        input: &RunPipelineInput,
        analysis: &AnalysisResult,
        history: &[IterationRecord],
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<IterationRecord, RunPipelineError> {
        let timeout = input.params.call_timeout;

        let review = self
            .review_analysis(analysis, &input.context, history, timeout)
            .await?;
        progress.on_review_complete(iteration, review.confidence);

        // Refinement: the outliner sees the latest usable deck and the
        // feedback it drew, if any
        let prior = history.iter().rev().find(|r| r.is_success());
        let prior_doc = prior.and_then(|r| r.document.as_ref());
        let prior_feedback = prior.and_then(|r| r.feedback.as_ref());
        let composed = self
            .run_stages(
                analysis,
                &input.context,
                prior_doc,
                prior_feedback,
                timeout,
                progress,
            )
            .await?;

        let mut confidence = review.confidence;
        let mut feedback = None;
        if gate::needs_feedback(analysis, &review, iteration, &input.context) {
            let record = self
                .gather_feedback(iteration, &review, &composed, progress)
                .await?;
            confidence = adjust_confidence(review.confidence, &record);
            info!(
                iteration,
                approval = record.approval.as_str(),
                confidence,
                "feedback applied"
            );
            feedback = Some(record);
        }

        Ok(IterationRecord {
            index: iteration,
            analysis: analysis.clone(),
            review: Some(review),
            feedback,
            document: Some(composed),
            confidence,
            failure: None,
        })
    }

    /// Send one prompt through the gateway, guarded by the per-call
    /// timeout and the run's cancellation token.
    pub(super) async fn call_model(
        &self,
        prompt: &str,
        timeout: Duration,
    ) -> Result<String, StageFailure> {
        let guarded = async {
            match tokio::time::timeout(
                timeout,
                self.gateway.complete(StagePromptTemplate::system(), prompt),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            }
        };

        match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(StageFailure::Cancelled),
                    result = guarded => result.map_err(StageFailure::from),
                }
            }
            None => guarded.await.map_err(StageFailure::from),
        }
    }

    /// Block on the feedback provider, guarded by the cancellation token
    async fn gather_feedback(
        &self,
        iteration: u32,
        review: &slideforge_domain::ReviewResult,
        document: &ComposedDocument,
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<slideforge_domain::FeedbackRecord, RunPipelineError> {
        use crate::ports::feedback::FeedbackError;

        progress.on_feedback_required(iteration);
        info!(iteration, "awaiting feedback");

        let wait = self.feedback.request_feedback(iteration, review, document);
        let result = match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(RunPipelineError::Cancelled),
                    result = wait => result,
                }
            }
            None => wait.await,
        };

        result.map_err(|error| match error {
            FeedbackError::Cancelled => RunPipelineError::Cancelled,
            other => RunPipelineError::Feedback(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::feedback::{
        AlwaysReject, FeedbackError, FeedbackProvider, ScriptedFeedback,
    };
    use async_trait::async_trait;
    use slideforge_domain::{
        BusinessContext, CellValue, Dataset, FeedbackRecord, ReviewResult, Urgency,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test doubles ====================

    /// Replays a fixed queue of gateway responses, recording every prompt
    /// it is handed
    struct ScriptedGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGateway {
        fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn recorded_prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmGateway for ScriptedGateway {
        async fn complete(
            &self,
            _system_prompt: &str,
            prompt: &str,
        ) -> Result<String, GatewayError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    /// Never resolves; stands in for a human who walked away
    struct PendingFeedback;

    #[async_trait]
    impl FeedbackProvider for PendingFeedback {
        async fn request_feedback(
            &self,
            _iteration: u32,
            _review: &ReviewResult,
            _document: &ComposedDocument,
        ) -> Result<FeedbackRecord, FeedbackError> {
            std::future::pending().await
        }
    }

    // ==================== Response builders ====================

    fn review_json(confidence: f64) -> String {
        format!(
            r#"{{"analysis_quality": 80, "business_relevance": 80, "insight_depth": 70,
                 "recommendation_strength": 70, "confidence": {confidence}}}"#
        )
    }

    fn summary_json() -> String {
        r#"{"executive_summary": "Revenue grew steadily over the period.",
            "key_insights": ["revenue is increasing"],
            "story_arcs": ["growth"]}"#
            .to_string()
    }

    fn slide_list(ids: &[&str], fields: &str) -> String {
        ids.iter()
            .map(|id| format!(r#"{{"id": "{id}", "title": "Slide {id}"{fields}}}"#))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn outline_json(ids: &[&str]) -> String {
        format!(
            r#"{{"narrative_flow": "growth story", "slides": [{}]}}"#,
            slide_list(ids, r#", "purpose": "show growth""#)
        )
    }

    fn styled_json(ids: &[&str]) -> String {
        format!(
            r#"{{"theme": {{"name": "clean"}}, "slides": [{}]}}"#,
            slide_list(ids, r#", "body": ["point"]"#)
        )
    }

    fn charted_json(ids: &[&str]) -> String {
        format!(
            r#"{{"slides": [{}],
                 "charts": [{{"slide_id": "{}", "chart_type": "line", "title": "Revenue"}}]}}"#,
            slide_list(ids, ""),
            ids[0],
        )
    }

    fn composed_json(ids: &[&str]) -> String {
        let slides = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"id": "{id}", "title": "Slide {id}",
                         "elements": [{{"kind": "title", "content": "Slide {id}"}},
                                      {{"kind": "text", "content": "Body text"}}],
                         "speaker_notes": "notes"}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!(r#"{{"theme": {{"name": "clean"}}, "slides": [{slides}]}}"#)
    }

    /// One fully successful iteration: review + five stage responses
    fn successful_iteration(confidence: f64, ids: &[&str]) -> Vec<Result<String, GatewayError>> {
        vec![
            Ok(review_json(confidence)),
            Ok(summary_json()),
            Ok(outline_json(ids)),
            Ok(styled_json(ids)),
            Ok(charted_json(ids)),
            Ok(composed_json(ids)),
        ]
    }

    fn revenue_dataset() -> Dataset {
        let rows = vec![
            ("2024-01-31", 100.0, "north"),
            ("2024-02-29", 110.0, "north"),
            ("2024-03-31", 125.0, "south"),
            ("2024-04-30", 138.0, "south"),
            ("2024-05-31", 150.0, "west"),
            ("2024-06-30", 170.0, "west"),
        ];
        Dataset::new(
            vec![
                "date".to_string(),
                "revenue".to_string(),
                "region".to_string(),
            ],
            rows.into_iter()
                .map(|(date, revenue, region)| {
                    vec![
                        CellValue::Text(date.to_string()),
                        CellValue::Number(revenue),
                        CellValue::Text(region.to_string()),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    fn params(max_iterations: u32, threshold: f64, retry_budget: u32) -> PipelineParams {
        PipelineParams {
            max_iterations,
            confidence_threshold: threshold,
            stage_retry_budget: retry_budget,
            call_timeout: Duration::from_secs(5),
        }
    }

    fn use_case(
        responses: Vec<Result<String, GatewayError>>,
        feedback: Arc<dyn FeedbackProvider>,
    ) -> RunPipelineUseCase {
        RunPipelineUseCase::new(Arc::new(ScriptedGateway::new(responses)), feedback)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_single_iteration_stops_on_confidence() {
        let uc = use_case(
            successful_iteration(90.0, &["s1", "s2"]),
            Arc::new(ScriptedFeedback::new(vec![])),
        );
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(3, 85.0, 2));

        let output = uc.execute(input).await.unwrap();

        assert_eq!(output.stop_reason, StopReason::ConfidenceReached);
        assert_eq!(output.iterations, 1);
        assert_eq!(output.confidence, 90.0);
        assert_eq!(output.history.len(), 1);
        assert!(output.run_id.starts_with("run-"));

        // Slide count survives assembly, and every element is on-canvas
        assert_eq!(output.document.slides.len(), 2);
        for slide in &output.document.slides {
            for element in &slide.elements {
                assert!(element.position.x >= 0.0);
                assert!(element.position.y >= 0.0);
            }
        }
    }

    #[tokio::test]
    async fn test_pipeline_failed_after_retry_budget() {
        // Review succeeds, the summarizer returns garbage on all three
        // attempts (initial + two retries)
        let mut responses = Vec::new();
        for _ in 0..3 {
            responses.push(Ok(review_json(90.0)));
            responses.push(Ok("not json at all".to_string()));
        }
        let uc = use_case(responses, Arc::new(ScriptedFeedback::new(vec![])));
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(3, 85.0, 2));

        let error = uc.execute(input).await.unwrap_err();
        assert!(matches!(error, RunPipelineError::PipelineFailed { .. }));
    }

    #[tokio::test]
    async fn test_best_effort_keeps_earlier_success() {
        // Iteration 1 succeeds at confidence 60; iteration 2's summarizer
        // fails with no retries left
        let mut responses = successful_iteration(60.0, &["s1"]);
        responses.push(Ok(review_json(65.0)));
        responses.push(Ok("garbage".to_string()));
        let uc = use_case(responses, Arc::new(ScriptedFeedback::new(vec![])));
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(3, 95.0, 0));

        let output = uc.execute(input).await.unwrap();

        assert_eq!(output.stop_reason, StopReason::BestEffort);
        assert_eq!(output.confidence, 60.0);
        assert_eq!(output.iterations, 2);
        assert_eq!(output.history.len(), 2);
        assert!(output.history[0].is_success());
        assert!(!output.history[1].is_success());
        assert_eq!(output.document.slides.len(), 1);
    }

    #[tokio::test]
    async fn test_approval_stops_after_threshold_check() {
        // Iteration 1: confidence 60, gate stays closed (first iteration).
        // Iteration 2: confidence 70 opens the gate; approval lifts it to
        // 85, still under the 99 threshold, so the stop reason is the
        // approval itself.
        let mut responses = successful_iteration(60.0, &["s1"]);
        responses.extend(successful_iteration(70.0, &["s1"]));
        let uc = use_case(
            responses,
            Arc::new(ScriptedFeedback::new(vec![FeedbackRecord::approved()])),
        );
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(5, 99.0, 0));

        let output = uc.execute(input).await.unwrap();

        assert_eq!(output.stop_reason, StopReason::Approved);
        assert_eq!(output.iterations, 2);
        assert_eq!(output.confidence, 85.0);
        assert!(output.history[1].feedback.as_ref().unwrap().is_approved());
    }

    #[tokio::test]
    async fn test_max_iterations_returns_last_success() {
        // Two low-confidence iterations; the second one's rejection drops
        // it to 50 but it is still the basis because it is the last
        // usable pass
        let mut responses = successful_iteration(60.0, &["s1"]);
        responses.extend(successful_iteration(70.0, &["s1"]));
        let uc = use_case(responses, Arc::new(AlwaysReject));
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(2, 99.0, 0));

        let output = uc.execute(input).await.unwrap();

        assert_eq!(output.stop_reason, StopReason::MaxIterations);
        assert_eq!(output.iterations, 2);
        assert_eq!(output.confidence, 50.0);
    }

    #[tokio::test]
    async fn test_unexplained_slide_loss_fails_the_stage() {
        // The stylist silently drops s2
        let responses = vec![
            Ok(review_json(90.0)),
            Ok(summary_json()),
            Ok(outline_json(&["s1", "s2"])),
            Ok(styled_json(&["s1"])),
        ];
        let uc = use_case(responses, Arc::new(ScriptedFeedback::new(vec![])));
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(1, 85.0, 0));

        let error = uc.execute(input).await.unwrap_err();
        match error {
            RunPipelineError::PipelineFailed { last_error } => {
                assert!(last_error.contains("stylist"), "got: {last_error}");
                assert!(last_error.contains("s2"), "got: {last_error}");
            }
            other => panic!("expected PipelineFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancellation_while_awaiting_feedback() {
        // Critical urgency forces the gate open on the first iteration;
        // the provider never answers, then the run is cancelled
        let token = CancellationToken::new();
        let uc = use_case(
            successful_iteration(90.0, &["s1"]),
            Arc::new(PendingFeedback),
        )
        .with_cancellation_token(token.clone());
        let input = RunPipelineInput::new(
            revenue_dataset(),
            BusinessContext::new("SaaS").with_urgency(Urgency::Critical),
        )
        .with_params(params(3, 85.0, 0));

        let handle = tokio::spawn(async move { uc.execute(input).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(RunPipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_prior_feedback_reaches_next_iteration_prompts() {
        // Critical urgency opens the gate on every iteration. Iteration
        // 1's feedback asks for a correction; iteration 2's reviewer and
        // outliner prompts must carry it.
        let mut responses = successful_iteration(60.0, &["s1"]);
        responses.extend(successful_iteration(70.0, &["s1"]));
        let gateway = Arc::new(ScriptedGateway::new(responses));
        let feedback = Arc::new(ScriptedFeedback::new(vec![
            FeedbackRecord::needs_minor_revision(vec![
                "focus on the EMEA region breakdown".to_string(),
            ]),
            FeedbackRecord::approved(),
        ]));
        let uc = RunPipelineUseCase::new(gateway.clone(), feedback);
        let input = RunPipelineInput::new(
            revenue_dataset(),
            BusinessContext::new("SaaS").with_urgency(Urgency::Critical),
        )
        .with_params(params(2, 99.0, 0));

        let output = uc.execute(input).await.unwrap();
        assert_eq!(output.iterations, 2);

        // Six calls per iteration: reviewer then the five stages
        let prompts = gateway.recorded_prompts();
        assert_eq!(prompts.len(), 12);
        let correction = "focus on the EMEA region breakdown";
        assert!(
            prompts[6].contains(correction),
            "iteration 2 reviewer prompt misses the correction"
        );
        assert!(
            prompts[8].contains(correction),
            "iteration 2 outliner prompt misses the correction"
        );
        // Iteration 1 has no feedback yet to carry
        assert!(!prompts[2].contains(correction));
    }

    #[tokio::test]
    async fn test_refinement_passes_prior_deck_to_outliner() {
        // Iteration 2's outliner drops s2 silently relative to iteration
        // 1's composed deck; with no retries and a prior success the run
        // degrades to best effort instead of failing
        let mut responses = successful_iteration(60.0, &["s1", "s2"]);
        responses.push(Ok(review_json(65.0)));
        responses.push(Ok(summary_json()));
        responses.push(Ok(outline_json(&["s1"])));
        let uc = use_case(responses, Arc::new(ScriptedFeedback::new(vec![])));
        let input = RunPipelineInput::new(revenue_dataset(), BusinessContext::new("SaaS"))
            .with_params(params(3, 95.0, 0));

        let output = uc.execute(input).await.unwrap();
        assert_eq!(output.stop_reason, StopReason::BestEffort);
        assert_eq!(output.document.slides.len(), 2);
        let failure = output.history[1].failure.as_ref().unwrap();
        assert!(failure.contains("outliner"), "got: {failure}");
    }
}
