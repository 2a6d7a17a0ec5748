//! Pairwise Pearson correlation between numeric columns

use crate::dataset::{Column, Dataset};
use serde::{Deserialize, Serialize};

/// Pearson correlation between two numeric columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub column_a: String,
    pub column_b: String,
    pub coefficient: f64,
}

/// Compute correlations for every pair of numeric columns.
///
/// Rows where either column fails to parse as a number are excluded from
/// that pair's computation. Pairs are emitted in column declaration order,
/// each unordered pair once.
pub fn pairwise(dataset: &Dataset) -> Vec<Correlation> {
    let numeric = dataset.numeric_columns();
    let mut result = Vec::new();

    for (i, a) in numeric.iter().enumerate() {
        for b in numeric.iter().skip(i + 1) {
            result.push(Correlation {
                column_a: a.name().to_string(),
                column_b: b.name().to_string(),
                coefficient: pearson_aligned(a, b),
            });
        }
    }

    result
}

/// Align two columns by row index, skipping rows where either side is
/// non-numeric, then compute Pearson's r
pub fn pearson_aligned(a: &Column, b: &Column) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .values()
        .iter()
        .zip(b.values())
        .filter_map(|(x, y)| Some((x.as_number()?, y.as_number()?)))
        .collect();
    pearson(&pairs)
}

/// Pearson correlation over aligned pairs.
///
/// Returns 0 when either series has zero variance (divide-by-zero guard)
/// or fewer than two pairs remain after alignment.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return 0.0;
    }

    let nf = n as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CellValue;

    fn dataset_of(columns: Vec<(&str, Vec<CellValue>)>) -> Dataset {
        let names: Vec<String> = columns.iter().map(|(n, _)| n.to_string()).collect();
        let rows = (0..columns[0].1.len())
            .map(|i| columns.iter().map(|(_, v)| v[i].clone()).collect())
            .collect();
        Dataset::new(names, rows).unwrap()
    }

    fn nums(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Number(*v)).collect()
    }

    #[test]
    fn test_self_correlation_is_one() {
        let a: Vec<(f64, f64)> = [1.0, 2.0, 3.0, 4.0].iter().map(|v| (*v, *v)).collect();
        assert!((pearson(&a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_is_symmetric() {
        let xs = [1.0, 2.0, 3.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 4.0];
        let ab: Vec<(f64, f64)> = xs.iter().zip(&ys).map(|(x, y)| (*x, *y)).collect();
        let ba: Vec<(f64, f64)> = ys.iter().zip(&xs).map(|(y, x)| (*y, *x)).collect();
        assert!((pearson(&ab) - pearson(&ba)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_guard() {
        let pairs: Vec<(f64, f64)> = [1.0, 2.0, 3.0].iter().map(|v| (5.0, *v)).collect();
        assert_eq!(pearson(&pairs), 0.0);
    }

    #[test]
    fn test_perfect_negative_correlation() {
        let pairs: Vec<(f64, f64)> = [1.0, 2.0, 3.0].iter().map(|v| (*v, -v)).collect();
        assert!((pearson(&pairs) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rows_with_malformed_values_excluded_per_pair() {
        // One malformed cell in ten keeps the column within the numeric
        // classification threshold, so the pair is still computed
        let mut a = nums(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        a[1] = CellValue::Text("bad".to_string());
        let ds = dataset_of(vec![
            ("a", a),
            ("b", nums(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0])),
        ]);
        // The malformed row is dropped; remaining pairs are perfectly linear.
        let correlations = pairwise(&ds);
        assert_eq!(correlations.len(), 1);
        assert!((correlations[0].coefficient - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pairwise_emits_each_pair_once() {
        let ds = dataset_of(vec![
            ("a", nums(&[1.0, 2.0, 3.0])),
            ("b", nums(&[2.0, 4.0, 6.0])),
            ("c", nums(&[3.0, 2.0, 1.0])),
        ]);
        let correlations = pairwise(&ds);
        assert_eq!(correlations.len(), 3);
    }
}
