//! Final presentation document (the pipeline's sole output artifact)
//!
//! Everything here is fully concrete: every element has a position, size,
//! and style, so downstream renderers never need null-checks. Defaults for
//! fields a stage agent omitted are documented on the constants below.

pub mod assembler;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Logical slide canvas, 16:9
pub const SLIDE_WIDTH: f64 = 960.0;
pub const SLIDE_HEIGHT: f64 = 540.0;

/// Minimum renderable element extents
pub const MIN_ELEMENT_WIDTH: f64 = 40.0;
pub const MIN_ELEMENT_HEIGHT: f64 = 24.0;

/// Style defaults applied when a composed element omits them
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
pub const DEFAULT_FONT_SIZE: f64 = 18.0;
pub const DEFAULT_TEXT_COLOR: &str = "#1F2933";
pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_ACCENT_COLOR: &str = "#2563EB";

/// Absolute position and size of an element on the slide canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Position {
    /// Clamp coordinates to non-negative values and extents to the
    /// documented minimums
    pub fn normalized(self) -> Self {
        Self {
            x: self.x.max(0.0),
            y: self.y.max(0.0),
            width: self.width.max(MIN_ELEMENT_WIDTH),
            height: self.height.max(MIN_ELEMENT_HEIGHT),
        }
    }
}

/// What an element renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Title,
    Text,
    Chart,
    Image,
    Shape,
}

impl ElementKind {
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Title => "title",
            ElementKind::Text => "text",
            ElementKind::Chart => "chart",
            ElementKind::Image => "image",
            ElementKind::Shape => "shape",
        }
    }
}

/// Fully-resolved element style; colors are opaque strings for consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub font_family: String,
    pub font_size: f64,
    pub color: String,
    pub background: String,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: DEFAULT_TEXT_COLOR.to_string(),
            background: "transparent".to_string(),
        }
    }
}

/// One positioned element on a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideElement {
    pub id: String,
    pub kind: ElementKind,
    pub position: Position,
    pub content: String,
    pub style: ElementStyle,
    /// Animation name; "none" when the composer specified nothing
    pub animation: String,
}

/// A slide with a stable id and at least one element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub elements: Vec<SlideElement>,
    pub speaker_notes: String,
}

/// Presentation-wide theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: String,
    pub accent_color: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            background: DEFAULT_BACKGROUND.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

/// Generation provenance attached to the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Final confidence of the iteration the document was assembled from
    pub confidence: f64,
    /// How many iterations the run performed
    pub iterations: u32,
    pub provenance: String,
    pub generated_at: DateTime<Utc>,
}

/// The final output handed to persistence and the external editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationDocument {
    pub id: String,
    pub title: String,
    pub slides: Vec<Slide>,
    pub theme: Theme,
    pub metadata: DocumentMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_normalization() {
        let p = Position {
            x: -10.0,
            y: -5.0,
            width: 1.0,
            height: 2.0,
        }
        .normalized();
        assert_eq!(p.x, 0.0);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.width, MIN_ELEMENT_WIDTH);
        assert_eq!(p.height, MIN_ELEMENT_HEIGHT);
    }

    #[test]
    fn test_normalization_keeps_valid_extents() {
        let p = Position {
            x: 60.0,
            y: 40.0,
            width: 840.0,
            height: 80.0,
        }
        .normalized();
        assert_eq!(p.width, 840.0);
        assert_eq!(p.height, 80.0);
    }
}
