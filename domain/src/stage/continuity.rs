//! Slide id continuity invariant
//!
//! Every slide id present at stage N must remain present through later
//! stages unless explicitly dropped with a reason. Unexplained id loss is
//! a defect in the producing stage and fails validation.

use super::Stage;
use super::documents::DroppedSlide;
use crate::core::error::DomainError;
use tracing::warn;

/// Verify that `present` retains every id in `expected`, allowing ids
/// listed in `dropped` (each intentional drop is logged).
///
/// Returns the ids still expected downstream (i.e. `expected` minus the
/// intentional drops).
pub fn verify_slide_continuity(
    stage: Stage,
    expected: &[String],
    present: &[String],
    dropped: &[DroppedSlide],
) -> Result<Vec<String>, DomainError> {
    for drop in dropped {
        warn!(
            stage = stage.as_str(),
            slide_id = %drop.id,
            reason = %drop.reason,
            "slide intentionally dropped"
        );
    }

    let missing: Vec<String> = expected
        .iter()
        .filter(|id| {
            !present.contains(id) && !dropped.iter().any(|d| &d.id == *id)
        })
        .cloned()
        .collect();

    if !missing.is_empty() {
        return Err(DomainError::SlideContinuity {
            stage: stage.as_str().to_string(),
            missing,
        });
    }

    Ok(expected
        .iter()
        .filter(|id| !dropped.iter().any(|d| &d.id == *id))
        .cloned()
        .collect())
}
