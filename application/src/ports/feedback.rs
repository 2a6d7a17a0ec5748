//! Feedback provider port for the Human Feedback Gate
//!
//! When the gate decides an iteration needs review, the controller
//! transitions to `AwaitingFeedback` and blocks on this port until a
//! [`FeedbackRecord`] arrives. Production supplies a human-backed
//! implementation; tests and batch runs supply scripted ones — the code
//! path is identical either way.
//!
//! # Built-in Implementations
//!
//! - [`AlwaysApprove`] — approves every request (batch/CI runs)
//! - [`AlwaysReject`] — requests a major revision every time
//! - [`ScriptedFeedback`] — replays a prepared queue of records

use async_trait::async_trait;
use slideforge_domain::{ComposedDocument, FeedbackRecord, ReviewResult};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Error type for feedback operations.
///
/// These represent failures of the feedback channel itself, not
/// revision requests from the reviewer.
#[derive(Debug, Clone)]
pub enum FeedbackError {
    /// The waiting run was cancelled (e.g. user abandoned it).
    Cancelled,
    /// Input/output error in the feedback channel.
    IoError(String),
    /// The channel produced something unusable.
    InvalidInput(String),
}

impl std::fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackError::Cancelled => write!(f, "Feedback wait cancelled"),
            FeedbackError::IoError(msg) => write!(f, "I/O error: {}", msg),
            FeedbackError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for FeedbackError {}

/// Port for obtaining a feedback record when the gate fires.
///
/// Implementations may block indefinitely (human review); the controller
/// guards the wait with its cancellation token.
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    /// Request feedback on the current iteration's result.
    ///
    /// * `iteration` — 1-based index of the iteration under review
    /// * `review` — the Insight Reviewer's assessment
    /// * `document` — the composed document produced this iteration
    async fn request_feedback(
        &self,
        iteration: u32,
        review: &ReviewResult,
        document: &ComposedDocument,
    ) -> Result<FeedbackRecord, FeedbackError>;
}

/// Approves every iteration without inspection.
///
/// Suitable for unattended runs where the confidence threshold alone
/// should drive convergence.
pub struct AlwaysApprove;

#[async_trait]
impl FeedbackProvider for AlwaysApprove {
    async fn request_feedback(
        &self,
        _iteration: u32,
        _review: &ReviewResult,
        _document: &ComposedDocument,
    ) -> Result<FeedbackRecord, FeedbackError> {
        Ok(FeedbackRecord::approved())
    }
}

/// Requests a major revision every time; the conservative non-interactive
/// mode.
pub struct AlwaysReject;

#[async_trait]
impl FeedbackProvider for AlwaysReject {
    async fn request_feedback(
        &self,
        _iteration: u32,
        _review: &ReviewResult,
        _document: &ComposedDocument,
    ) -> Result<FeedbackRecord, FeedbackError> {
        Ok(FeedbackRecord::needs_major_revision(vec![
            "automatic rejection: no reviewer available".to_string(),
        ]))
    }
}

/// Replays a prepared queue of feedback records, one per gate firing.
///
/// Returns an error when the queue is exhausted, which surfaces scripting
/// mistakes in tests instead of hiding them.
pub struct ScriptedFeedback {
    records: Mutex<VecDeque<FeedbackRecord>>,
}

impl ScriptedFeedback {
    pub fn new(records: Vec<FeedbackRecord>) -> Self {
        Self {
            records: Mutex::new(records.into()),
        }
    }
}

#[async_trait]
impl FeedbackProvider for ScriptedFeedback {
    async fn request_feedback(
        &self,
        iteration: u32,
        _review: &ReviewResult,
        _document: &ComposedDocument,
    ) -> Result<FeedbackRecord, FeedbackError> {
        self.records
            .lock()
            .map_err(|_| FeedbackError::IoError("feedback queue poisoned".to_string()))?
            .pop_front()
            .ok_or_else(|| {
                FeedbackError::InvalidInput(format!(
                    "no scripted feedback left for iteration {}",
                    iteration
                ))
            })
    }
}
