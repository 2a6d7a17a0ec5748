//! Per-iteration snapshots accumulated by the pipeline controller
//!
//! History is explicit state threaded through the controller, never a
//! process-wide singleton: parallel runs own their own histories and tests
//! replay them deterministically.

use crate::analysis::AnalysisResult;
use crate::feedback::FeedbackRecord;
use crate::review::ReviewResult;
use crate::stage::documents::ComposedDocument;
use serde::{Deserialize, Serialize};

/// Snapshot of one loop pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration index
    pub index: u32,
    pub analysis: AnalysisResult,
    /// Absent when the iteration failed before the review completed
    pub review: Option<ReviewResult>,
    pub feedback: Option<FeedbackRecord>,
    /// The composed stage document; absent for failed iterations
    pub document: Option<ComposedDocument>,
    /// Combined confidence for this pass (0 for failed iterations)
    pub confidence: f64,
    /// Error summary when the iteration failed
    pub failure: Option<String>,
}

impl IterationRecord {
    /// An iteration is usable when it produced a composed document
    pub fn is_success(&self) -> bool {
        self.document.is_some()
    }

    /// Build a zero-confidence record for a failed pass
    pub fn failed(index: u32, analysis: AnalysisResult, failure: String) -> Self {
        Self {
            index,
            analysis,
            review: None,
            feedback: None,
            document: None,
            confidence: 0.0,
            failure: Some(failure),
        }
    }
}

/// The best usable iteration: highest confidence among successful passes,
/// later iterations winning ties
pub fn best_record(history: &[IterationRecord]) -> Option<&IterationRecord> {
    history
        .iter()
        .filter(|r| r.is_success())
        .max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
