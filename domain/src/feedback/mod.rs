//! Human/heuristic feedback records and confidence adjustment

use serde::{Deserialize, Serialize};

/// Confidence delta applied per approval level
const APPROVED_BONUS: f64 = 15.0;
const MINOR_REVISION_PENALTY: f64 = 5.0;
const MAJOR_REVISION_PENALTY: f64 = 20.0;

/// How the reviewer (human or scripted) judged the iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalLevel {
    Approved,
    NeedsMinorRevision,
    NeedsMajorRevision,
}

impl ApprovalLevel {
    pub fn as_str(&self) -> &str {
        match self {
            ApprovalLevel::Approved => "approved",
            ApprovalLevel::NeedsMinorRevision => "needs_minor_revision",
            ApprovalLevel::NeedsMajorRevision => "needs_major_revision",
        }
    }
}

/// Structured judgment consumed by the next iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub approval: ApprovalLevel,
    #[serde(default)]
    pub corrections: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub priorities: Vec<String>,
}

impl FeedbackRecord {
    pub fn approved() -> Self {
        Self {
            approval: ApprovalLevel::Approved,
            corrections: vec![],
            follow_up_questions: vec![],
            priorities: vec![],
        }
    }

    pub fn needs_minor_revision(corrections: Vec<String>) -> Self {
        Self {
            approval: ApprovalLevel::NeedsMinorRevision,
            corrections,
            follow_up_questions: vec![],
            priorities: vec![],
        }
    }

    pub fn needs_major_revision(corrections: Vec<String>) -> Self {
        Self {
            approval: ApprovalLevel::NeedsMajorRevision,
            corrections,
            follow_up_questions: vec![],
            priorities: vec![],
        }
    }

    pub fn is_approved(&self) -> bool {
        self.approval == ApprovalLevel::Approved
    }
}

/// Combine the reviewer's base confidence with a feedback record:
/// approved +15 (cap 100), minor revision -5, major revision -20 (floor 0)
pub fn adjust_confidence(base: f64, feedback: &FeedbackRecord) -> f64 {
    match feedback.approval {
        ApprovalLevel::Approved => (base + APPROVED_BONUS).min(100.0),
        ApprovalLevel::NeedsMinorRevision => (base - MINOR_REVISION_PENALTY).max(0.0),
        ApprovalLevel::NeedsMajorRevision => (base - MAJOR_REVISION_PENALTY).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_adjustments_from_base_60() {
        assert_eq!(adjust_confidence(60.0, &FeedbackRecord::approved()), 75.0);
        assert_eq!(
            adjust_confidence(60.0, &FeedbackRecord::needs_minor_revision(vec![])),
            55.0
        );
        assert_eq!(
            adjust_confidence(60.0, &FeedbackRecord::needs_major_revision(vec![])),
            40.0
        );
    }

    #[test]
    fn test_confidence_capped_at_100() {
        assert_eq!(adjust_confidence(95.0, &FeedbackRecord::approved()), 100.0);
    }

    #[test]
    fn test_confidence_floored_at_0() {
        assert_eq!(
            adjust_confidence(10.0, &FeedbackRecord::needs_major_revision(vec![])),
            0.0
        );
    }

    #[test]
    fn test_approval_level_serde_names() {
        let json = serde_json::to_string(&ApprovalLevel::NeedsMajorRevision).unwrap();
        assert_eq!(json, "\"needs_major_revision\"");
    }
}
