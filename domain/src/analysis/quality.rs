//! Data quality scoring

use crate::dataset::{ColumnKind, Dataset};
use serde::{Deserialize, Serialize};

/// Penalty per missing/null/empty cell
const MISSING_PENALTY: f64 = 2.0;

/// Penalty per inconsistent cell (non-missing value in a numeric column
/// that does not parse as a number)
const INCONSISTENCY_PENALTY: f64 = 3.0;

/// Threshold below which the feedback gate considers data quality low
pub const LOW_QUALITY_THRESHOLD: f64 = 70.0;

/// Data quality assessment: 0-100 score plus human-readable issues
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    pub score: f64,
    pub issues: Vec<String>,
}

impl DataQuality {
    pub fn is_low(&self) -> bool {
        self.score < LOW_QUALITY_THRESHOLD
    }
}

/// Score the dataset starting at 100, penalizing missing cells and
/// inconsistencies, floored at 0
pub fn assess(dataset: &Dataset) -> DataQuality {
    let mut score = 100.0;
    let mut issues = Vec::new();

    for column in dataset.columns() {
        let missing = column.values().iter().filter(|v| v.is_missing()).count();
        if missing > 0 {
            score -= missing as f64 * MISSING_PENALTY;
            issues.push(format!(
                "column '{}' has {} missing value(s)",
                column.name(),
                missing
            ));
        }

        if column.kind() == ColumnKind::Numeric {
            let inconsistent = column
                .values()
                .iter()
                .filter(|v| !v.is_missing() && v.as_number().is_none())
                .count();
            if inconsistent > 0 {
                score -= inconsistent as f64 * INCONSISTENCY_PENALTY;
                issues.push(format!(
                    "column '{}' has {} non-numeric value(s) in a numeric column",
                    column.name(),
                    inconsistent
                ));
            }
        }
    }

    DataQuality {
        score: score.max(0.0),
        issues,
    }
}
