//! Domain layer for slideforge
//!
//! This crate contains the pure business logic of the generation pipeline:
//! dataset modeling and statistics, the evolving stage documents, review
//! and feedback records, and the output assembler. It performs no I/O and
//! makes no model calls; those live behind ports in the application layer.
//!
//! # Core Concepts
//!
//! ## Iteration
//!
//! One full pass of Analyzer → Reviewer → stage agents → (feedback) →
//! evaluation. The controller accumulates an [`IterationRecord`] per pass.
//!
//! ## Stage documents
//!
//! The slide representation evolves through five ordered transformers
//! (Summarizer → Outliner → Stylist → Chart Specifier → Composer), each
//! producing a richer document shape while preserving slide ids.

pub mod analysis;
pub mod context;
pub mod core;
pub mod dataset;
pub mod feedback;
pub mod iteration;
pub mod presentation;
pub mod prompt;
pub mod review;
pub mod schema;
pub mod stage;

// Re-export commonly used types
pub use analysis::{
    AnalysisResult, ChartHint, Correlation, DataQuality, DescriptiveStats, OutlierReport, Trend,
    TrendDirection, analyze,
};
pub use context::{BusinessContext, Urgency};
pub use core::error::DomainError;
pub use dataset::{CellValue, Column, ColumnKind, Dataset};
pub use feedback::{ApprovalLevel, FeedbackRecord, adjust_confidence};
pub use iteration::{IterationRecord, best_record};
pub use presentation::{
    DocumentMetadata, ElementKind, ElementStyle, Position, PresentationDocument, Slide,
    SlideElement, Theme, assembler::assemble,
};
pub use prompt::StagePromptTemplate;
pub use review::ReviewResult;
pub use stage::{
    Stage,
    continuity::verify_slide_continuity,
    documents::{
        ChartSeries, ChartSpec, ChartedDocument, ComposedDocument, ComposedElement, ComposedSlide,
        ComposedStyle, DroppedSlide, OutlineDocument, OutlineSlide, SlideStyling, StyledDocument,
        StyledSlide, SummaryDocument, ThemeSpec,
    },
};
