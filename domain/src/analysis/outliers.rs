//! IQR outlier detection

use crate::dataset::{Column, Dataset};
use serde::{Deserialize, Serialize};

/// Multiplier applied to the interquartile range when placing fences
const IQR_FENCE: f64 = 1.5;

/// Outliers detected in one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    /// Values below the lower fence or above the upper fence
    pub values: Vec<f64>,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

/// Detect outliers in every numeric column using the IQR method.
///
/// Fences sit at Q1 − 1.5×IQR and Q3 + 1.5×IQR with linear-interpolated
/// quartiles. Columns without outliers are omitted from the result.
pub fn detect(dataset: &Dataset) -> Vec<OutlierReport> {
    dataset
        .numeric_columns()
        .into_iter()
        .filter_map(detect_in_column)
        .collect()
}

fn detect_in_column(column: &Column) -> Option<OutlierReport> {
    let mut values = column.numeric_values();
    if values.len() < 4 {
        // Quartiles over fewer points flag nothing meaningful
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&values, 0.25);
    let q3 = quantile(&values, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - IQR_FENCE * iqr;
    let upper_fence = q3 + IQR_FENCE * iqr;

    let outliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    if outliers.is_empty() {
        return None;
    }

    Some(OutlierReport {
        column: column.name().to_string(),
        values: outliers,
        lower_fence,
        upper_fence,
    })
}

/// Linear-interpolated quantile over a sorted slice
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    debug_assert!((0.0..=1.0).contains(&q));

    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
