//! Per-stage document schemas
//!
//! Each struct is the declared response schema for one stage agent,
//! validated through [`crate::schema::decode`]. Optional fields carry
//! serde defaults so a terse model response still validates; required
//! fields missing from the response surface as `SchemaValidation` errors.

use crate::presentation::Position;
use serde::{Deserialize, Serialize};

/// A slide intentionally removed by a stage, with the reason logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedSlide {
    pub id: String,
    pub reason: String,
}

// ==================== Summarizer (stage a) ====================

/// Executive summary, key insights, and story arcs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub executive_summary: String,
    pub key_insights: Vec<String>,
    #[serde(default)]
    pub story_arcs: Vec<String>,
}

// ==================== Outliner (stage b) ====================

/// One planned slide in the outline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSlide {
    pub id: String,
    pub title: String,
    /// What this slide contributes to the narrative
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub talking_points: Vec<String>,
}

/// Ordered slide outline with narrative flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineDocument {
    #[serde(default)]
    pub narrative_flow: String,
    pub slides: Vec<OutlineSlide>,
    #[serde(default)]
    pub dropped_slides: Vec<DroppedSlide>,
}

impl OutlineDocument {
    pub fn slide_ids(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.id.clone()).collect()
    }
}

// ==================== Stylist (stage c) ====================

/// Visual styling for one slide
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SlideStyling {
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}

/// A slide with layout template and styling applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledSlide {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: Vec<String>,
    #[serde(default)]
    pub styling: SlideStyling,
}

/// Presentation-wide theme proposal from the Stylist
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThemeSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}

/// Outline with per-slide layout and styling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledDocument {
    #[serde(default)]
    pub theme: ThemeSpec,
    pub slides: Vec<StyledSlide>,
    #[serde(default)]
    pub dropped_slides: Vec<DroppedSlide>,
}

impl StyledDocument {
    pub fn slide_ids(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.id.clone()).collect()
    }
}

// ==================== Chart Specifier (stage d) ====================

/// One data series in a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub name: String,
    #[serde(default)]
    pub values: Vec<f64>,
    #[serde(default)]
    pub labels: Vec<String>,
}

/// A chart bound to a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub slide_id: String,
    pub chart_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub series: Vec<ChartSeries>,
    #[serde(default)]
    pub colors: Vec<String>,
}

/// Styled slides plus chart configurations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartedDocument {
    #[serde(default)]
    pub theme: ThemeSpec,
    pub slides: Vec<StyledSlide>,
    #[serde(default)]
    pub charts: Vec<ChartSpec>,
    #[serde(default)]
    pub dropped_slides: Vec<DroppedSlide>,
}

impl ChartedDocument {
    pub fn slide_ids(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.id.clone()).collect()
    }
}

// ==================== Composer (stage e) ====================

/// Element style as the Composer emits it, with every field optional
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComposedStyle {
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
}

/// An element as the Composer emits it; missing ids/positions/styles are
/// filled by the Output Assembler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedElement {
    #[serde(default)]
    pub id: Option<String>,
    /// "title", "text", "chart", "image" or "shape"
    pub kind: String,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: ComposedStyle,
    #[serde(default)]
    pub animation: Option<String>,
}

/// A fully composed slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedSlide {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub elements: Vec<ComposedElement>,
    #[serde(default)]
    pub speaker_notes: String,
}

/// The final stage document: absolute-positioned elements, typography,
/// animations, and speaker notes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedDocument {
    #[serde(default)]
    pub theme: ThemeSpec,
    pub slides: Vec<ComposedSlide>,
    #[serde(default)]
    pub dropped_slides: Vec<DroppedSlide>,
}

impl ComposedDocument {
    pub fn slide_ids(&self) -> Vec<String> {
        self.slides.iter().map(|s| s.id.clone()).collect()
    }
}
