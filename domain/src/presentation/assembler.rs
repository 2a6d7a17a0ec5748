//! Output Assembler
//!
//! Converts the final iteration's composed document into the persisted
//! presentation shape: stable ids for everything, documented defaults for
//! missing optional fields, and a synthesized title element for any slide
//! that would otherwise be empty. The output is always renderable without
//! null-checks downstream.

use super::{
    DEFAULT_TEXT_COLOR, ElementKind, ElementStyle, Position, PresentationDocument, SLIDE_WIDTH,
    Slide, SlideElement, Theme,
};
use crate::stage::documents::{ComposedDocument, ComposedElement, ThemeSpec};
use chrono::Utc;
use tracing::debug;

/// Default layout geometry for elements the composer left unpositioned
const TITLE_POSITION: Position = Position {
    x: 60.0,
    y: 40.0,
    width: SLIDE_WIDTH - 120.0,
    height: 80.0,
};
const BODY_X: f64 = 60.0;
const BODY_TOP: f64 = 150.0;
const BODY_WIDTH: f64 = SLIDE_WIDTH - 120.0;
const BODY_ROW_HEIGHT: f64 = 70.0;

/// Assemble the final presentation document.
///
/// Deterministic apart from the generation timestamp: ids are derived from
/// slide/element indices (`slide-3`, `el-3-2`), never random.
pub fn assemble(
    document: &ComposedDocument,
    confidence: f64,
    iterations: u32,
    run_id: &str,
) -> PresentationDocument {
    let theme = resolve_theme(&document.theme);
    let title = document
        .slides
        .first()
        .map(|s| s.title.clone())
        .unwrap_or_else(|| "Untitled presentation".to_string());

    let slides: Vec<Slide> = document
        .slides
        .iter()
        .enumerate()
        .map(|(i, slide)| assemble_slide(i + 1, slide, &theme))
        .collect();

    PresentationDocument {
        id: run_id.to_string(),
        title,
        slides,
        theme,
        metadata: super::DocumentMetadata {
            confidence,
            iterations,
            provenance: "slideforge-pipeline".to_string(),
            generated_at: Utc::now(),
        },
    }
}

fn assemble_slide(
    number: usize,
    slide: &crate::stage::documents::ComposedSlide,
    theme: &Theme,
) -> Slide {
    let id = if slide.id.trim().is_empty() {
        format!("slide-{}", number)
    } else {
        slide.id.clone()
    };

    let mut elements: Vec<SlideElement> = slide
        .elements
        .iter()
        .enumerate()
        .map(|(j, element)| assemble_element(number, j + 1, element, theme))
        .collect();

    // A slide must never render empty: synthesize a title element
    if elements.is_empty() {
        debug!(slide_id = %id, "slide has no elements, synthesizing title");
        elements.push(SlideElement {
            id: format!("el-{}-1", number),
            kind: ElementKind::Title,
            position: TITLE_POSITION.normalized(),
            content: slide.title.clone(),
            style: ElementStyle {
                font_family: theme.font_family.clone(),
                font_size: 36.0,
                color: DEFAULT_TEXT_COLOR.to_string(),
                background: "transparent".to_string(),
            },
            animation: "none".to_string(),
        });
    }

    Slide {
        id,
        title: slide.title.clone(),
        elements,
        speaker_notes: slide.speaker_notes.clone(),
    }
}

fn assemble_element(
    slide_number: usize,
    element_number: usize,
    element: &ComposedElement,
    theme: &Theme,
) -> SlideElement {
    let kind = parse_kind(&element.kind);

    let position = element
        .position
        .unwrap_or_else(|| default_position(kind, element_number))
        .normalized();

    let defaults = ElementStyle::default();
    let style = ElementStyle {
        font_family: element
            .style
            .font_family
            .clone()
            .unwrap_or_else(|| theme.font_family.clone()),
        font_size: element.style.font_size.unwrap_or(defaults.font_size),
        color: element.style.color.clone().unwrap_or(defaults.color),
        background: element
            .style
            .background
            .clone()
            .unwrap_or(defaults.background),
    };

    SlideElement {
        id: element
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("el-{}-{}", slide_number, element_number)),
        kind,
        position,
        content: element.content.clone(),
        style,
        animation: element
            .animation
            .clone()
            .unwrap_or_else(|| "none".to_string()),
    }
}

/// Unknown kinds render as plain text rather than failing assembly
fn parse_kind(kind: &str) -> ElementKind {
    match kind.to_lowercase().as_str() {
        "title" => ElementKind::Title,
        "chart" => ElementKind::Chart,
        "image" => ElementKind::Image,
        "shape" => ElementKind::Shape,
        _ => ElementKind::Text,
    }
}

fn default_position(kind: ElementKind, element_number: usize) -> Position {
    match kind {
        ElementKind::Title => TITLE_POSITION,
        _ => Position {
            x: BODY_X,
            y: BODY_TOP + (element_number.saturating_sub(1) as f64) * BODY_ROW_HEIGHT,
            width: BODY_WIDTH,
            height: BODY_ROW_HEIGHT - 10.0,
        },
    }
}

fn resolve_theme(spec: &ThemeSpec) -> Theme {
    let defaults = Theme::default();
    Theme {
        name: if spec.name.trim().is_empty() {
            defaults.name
        } else {
            spec.name.clone()
        },
        background: spec.background.clone().unwrap_or(defaults.background),
        accent_color: spec.accent_color.clone().unwrap_or(defaults.accent_color),
        font_family: spec.font_family.clone().unwrap_or(defaults.font_family),
    }
}
