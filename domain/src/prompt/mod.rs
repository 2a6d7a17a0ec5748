//! Prompt templates for the Insight Reviewer and the stage agents
//!
//! Prompts are deterministic functions of their inputs: the same analysis,
//! context, and history always produce the same prompt text. Each template
//! fixes the exact JSON response schema its stage is validated against.

use crate::analysis::AnalysisResult;
use crate::context::BusinessContext;
use crate::feedback::FeedbackRecord;
use crate::iteration::IterationRecord;
use crate::stage::documents::{
    ChartedDocument, ComposedDocument, OutlineDocument, StyledDocument, SummaryDocument,
};
use serde::Serialize;

/// Serialize a payload for prompt embedding; these types never fail to
/// serialize, but a broken payload degrades to `null` rather than
/// aborting prompt construction
fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}

/// Templates for the pipeline's model calls
pub struct StagePromptTemplate;

impl StagePromptTemplate {
    /// Shared system prompt for all pipeline calls
    pub fn system() -> &'static str {
        "You are a presentation-generation assistant working from tabular business data. \
         Always respond with a single JSON object matching the requested schema exactly. \
         Do not include any text outside the JSON object."
    }

    /// Insight Reviewer prompt: scores the analysis against the business
    /// context, with the last two iterations for continuity
    pub fn reviewer(
        analysis: &AnalysisResult,
        context: &BusinessContext,
        history: &[IterationRecord],
    ) -> String {
        let recent: Vec<serde_json::Value> = history
            .iter()
            .rev()
            .take(2)
            .rev()
            .map(|record| {
                serde_json::json!({
                    "iteration": record.index,
                    "confidence": record.confidence,
                    "improvement_areas": record
                        .review
                        .as_ref()
                        .map(|r| r.improvement_areas.clone())
                        .unwrap_or_default(),
                    "feedback": record.feedback.as_ref().map(|f| {
                        serde_json::json!({
                            "approval": f.approval.as_str(),
                            "corrections": f.corrections,
                            "follow_up_questions": f.follow_up_questions,
                            "priorities": f.priorities,
                        })
                    }),
                    "failed": record.failure.is_some(),
                })
            })
            .collect();

        format!(
            r#"Review the quality of this data analysis for the business context below.

## Analysis
{analysis}

## Business context
{context}

## Recent iterations
{history}

Score each dimension 0-100 and respond with JSON:
{{
  "analysis_quality": number,
  "business_relevance": number,
  "insight_depth": number,
  "recommendation_strength": number,
  "confidence": number,
  "improvement_areas": [string],
  "suggested_next_steps": [string]
}}"#,
            analysis = pretty(analysis),
            context = pretty(context),
            history = pretty(&recent),
        )
    }

    /// Summarizer: data analysis → executive summary, insights, story arcs
    pub fn summarizer(analysis: &AnalysisResult, context: &BusinessContext) -> String {
        format!(
            r#"Write an executive summary of this analysis for the business context below.

## Analysis
{analysis}

## Business context
{context}

Respond with JSON:
{{
  "executive_summary": string,
  "key_insights": [string],
  "story_arcs": [string]
}}"#,
            analysis = pretty(analysis),
            context = pretty(context),
        )
    }

    /// Outliner: insights → ordered slide outline with narrative flow.
    ///
    /// When a prior iteration's composed document exists, it is supplied
    /// for refinement and its slide ids must be preserved (or dropped
    /// explicitly with a reason). Feedback collected on that prior
    /// iteration is embedded so its corrections and priorities drive the
    /// revision.
    pub fn outliner(
        summary: &SummaryDocument,
        context: &BusinessContext,
        prior: Option<&ComposedDocument>,
        feedback: Option<&FeedbackRecord>,
    ) -> String {
        let refinement = match prior {
            Some(document) => format!(
                "\n## Previous presentation (refine, keep slide ids)\n{}\n\
                 Reuse the existing slide ids. If you remove a slide, list it in \
                 \"dropped_slides\" with a reason.\n",
                pretty(document)
            ),
            None => String::new(),
        };
        let feedback_section = match feedback {
            Some(record) => format!(
                "\n## Reviewer feedback on the previous iteration\n{}\n\
                 Apply every correction, answer the follow-up questions in the \
                 content, and order the story by the stated priorities.\n",
                pretty(record)
            ),
            None => String::new(),
        };

        format!(
            r#"Plan an ordered slide outline that tells this data story.

## Summary
{summary}

## Business context
{context}
{refinement}{feedback_section}
Respond with JSON:
{{
  "narrative_flow": string,
  "slides": [{{"id": string, "title": string, "purpose": string, "talking_points": [string]}}],
  "dropped_slides": [{{"id": string, "reason": string}}]
}}"#,
            summary = pretty(summary),
            context = pretty(context),
            refinement = refinement,
            feedback_section = feedback_section,
        )
    }

    /// Stylist: outline → per-slide layout template and styling
    pub fn stylist(outline: &OutlineDocument, context: &BusinessContext) -> String {
        format!(
            r#"Choose a layout template and visual styling for each slide in this outline.
Keep every slide id. If you remove a slide, list it in "dropped_slides" with a reason.

## Outline
{outline}

## Business context
{context}

Respond with JSON:
{{
  "theme": {{"name": string, "background": string, "accent_color": string, "font_family": string}},
  "slides": [{{"id": string, "title": string, "body": [string], "styling": {{"layout": string, "background": string, "accent_color": string, "font_family": string}}}}],
  "dropped_slides": [{{"id": string, "reason": string}}]
}}"#,
            outline = pretty(outline),
            context = pretty(context),
        )
    }

    /// Chart Specifier: styled slides + data → chart configs bound to
    /// slide ids
    pub fn chart_specifier(styled: &StyledDocument, analysis: &AnalysisResult) -> String {
        format!(
            r#"Specify charts for these styled slides using the chart hints and statistics.
Keep every slide id. Bind each chart to a slide id from the document.

## Styled slides
{styled}

## Analysis (chart hints and statistics)
{analysis}

Respond with JSON:
{{
  "theme": {{"name": string, "background": string, "accent_color": string, "font_family": string}},
  "slides": [{{"id": string, "title": string, "body": [string], "styling": {{"layout": string}}}}],
  "charts": [{{"slide_id": string, "chart_type": string, "title": string, "series": [{{"name": string, "values": [number], "labels": [string]}}], "colors": [string]}}],
  "dropped_slides": [{{"id": string, "reason": string}}]
}}"#,
            styled = pretty(styled),
            analysis = pretty(analysis),
        )
    }

    /// Composer: styled slides + charts → final composed slides with
    /// absolute-positioned elements, typography, animations, and notes
    pub fn composer(charted: &ChartedDocument, context: &BusinessContext) -> String {
        format!(
            r#"Compose the final slides: absolutely positioned elements on a 960x540 canvas,
typography, optional animations, and speaker notes. Keep every slide id.

## Slides and charts
{charted}

## Business context
{context}

Respond with JSON:
{{
  "theme": {{"name": string, "background": string, "accent_color": string, "font_family": string}},
  "slides": [{{
    "id": string,
    "title": string,
    "elements": [{{
      "id": string,
      "kind": "title" | "text" | "chart" | "image" | "shape",
      "position": {{"x": number, "y": number, "width": number, "height": number}},
      "content": string,
      "style": {{"font_family": string, "font_size": number, "color": string, "background": string}},
      "animation": string
    }}],
    "speaker_notes": string
  }}],
  "dropped_slides": [{{"id": string, "reason": string}}]
}}"#,
            charted = pretty(charted),
            context = pretty(context),
        )
    }
}
