//! Time trend classification for numeric columns

use crate::dataset::{Column, Dataset};
use serde::{Deserialize, Serialize};

/// Relative change beyond which a series counts as increasing/decreasing
const TREND_THRESHOLD: f64 = 0.1;

/// Confidence contributed per aligned sample, capped at [`TREND_CONFIDENCE_CAP`]
const TREND_CONFIDENCE_PER_SAMPLE: f64 = 5.0;
const TREND_CONFIDENCE_CAP: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

/// Trend of one numeric column over the dataset's first date column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub column: String,
    pub direction: TrendDirection,
    /// Relative change from first to last value after sorting by date
    pub relative_change: f64,
    /// 0-100, scales with the number of aligned samples up to a cap
    pub confidence: f64,
}

/// Compute trends for every numeric column.
///
/// Requires at least one date column; without one, no trends are produced.
/// Rows are sorted by date ascending and the relative change from first to
/// last value classifies the direction.
pub fn trends(dataset: &Dataset) -> Vec<Trend> {
    let Some(date_column) = dataset.date_columns().into_iter().next() else {
        return Vec::new();
    };

    dataset
        .numeric_columns()
        .into_iter()
        .filter_map(|column| trend_over(date_column, column))
        .collect()
}

fn trend_over(dates: &Column, column: &Column) -> Option<Trend> {
    let mut series: Vec<(chrono::NaiveDate, f64)> = dates
        .values()
        .iter()
        .zip(column.values())
        .filter_map(|(d, v)| Some((d.as_date()?, v.as_number()?)))
        .collect();
    if series.len() < 2 {
        return None;
    }
    series.sort_by_key(|(date, _)| *date);

    let first = series[0].1;
    let last = series[series.len() - 1].1;
    let relative_change = if first == 0.0 {
        // No baseline to divide by; direction follows the endpoint's sign
        match last.partial_cmp(&0.0)? {
            std::cmp::Ordering::Greater => 1.0,
            std::cmp::Ordering::Less => -1.0,
            std::cmp::Ordering::Equal => 0.0,
        }
    } else {
        (last - first) / first.abs()
    };

    let direction = if relative_change > TREND_THRESHOLD {
        TrendDirection::Increasing
    } else if relative_change < -TREND_THRESHOLD {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    let confidence =
        (series.len() as f64 * TREND_CONFIDENCE_PER_SAMPLE).min(TREND_CONFIDENCE_CAP);

    Some(Trend {
        column: column.name().to_string(),
        direction,
        relative_change,
        confidence,
    })
}
