//! Descriptive statistics for numeric columns

use crate::dataset::Column;
use serde::{Deserialize, Serialize};

/// Descriptive statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub column: String,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divide by N, not N-1)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Number of cells that parsed as finite numbers
    pub count: usize,
}

/// Compute descriptive statistics for a column.
///
/// Malformed cells are excluded rather than failing the computation.
/// Returns `None` when no cell parses as a number.
pub fn describe(column: &Column) -> Option<DescriptiveStats> {
    let values = column.numeric_values();
    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Some(DescriptiveStats {
        column: column.name().to_string(),
        mean,
        median: median_of_sorted(&sorted),
        std_dev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        count,
    })
}

/// Median via sorted-array midpoint; even counts average the two middle values
fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CellValue, Dataset};

    fn column_of(values: Vec<f64>) -> Dataset {
        let rows = values
            .into_iter()
            .map(|v| vec![CellValue::Number(v)])
            .collect();
        Dataset::new(vec!["v".to_string()], rows).unwrap()
    }

    #[test]
    fn test_mean_median_odd_count() {
        let ds = column_of(vec![3.0, 1.0, 2.0]);
        let stats = describe(ds.column("v").unwrap()).unwrap();
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 3.0);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_median_even_count_averages_middle_pair() {
        let ds = column_of(vec![4.0, 1.0, 3.0, 2.0]);
        let stats = describe(ds.column("v").unwrap()).unwrap();
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_std_dev_is_population_not_sample() {
        // Deliberate choice: divide by N. For [2, 4, 4, 4, 5, 5, 7, 9]
        // the population std-dev is exactly 2; the sample std-dev would
        // be ~2.138.
        let ds = column_of(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let stats = describe(ds.column("v").unwrap()).unwrap();
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_never_negative_and_zero_only_when_constant() {
        let ds = column_of(vec![5.0, 5.0, 5.0]);
        let stats = describe(ds.column("v").unwrap()).unwrap();
        assert_eq!(stats.std_dev, 0.0);

        let ds = column_of(vec![5.0, 5.1]);
        let stats = describe(ds.column("v").unwrap()).unwrap();
        assert!(stats.std_dev > 0.0);
    }

    #[test]
    fn test_malformed_cells_excluded_from_count() {
        let ds = Dataset::new(
            vec!["v".to_string()],
            vec![
                vec![CellValue::Number(1.0)],
                vec![CellValue::Text("bad".to_string())],
                vec![CellValue::Number(3.0)],
            ],
        )
        .unwrap();
        let stats = describe(ds.column("v").unwrap()).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
    }
}
