//! Tabular Analyzer
//!
//! Pure, deterministic statistics over a [`Dataset`] — no I/O, no model
//! calls. Produces the [`AnalysisResult`] consumed by the Insight Reviewer
//! and the stage agents each iteration.

pub mod correlation;
pub mod descriptive;
pub mod outliers;
pub mod quality;
pub mod trend;

use crate::core::error::DomainError;
use crate::dataset::{ColumnKind, Dataset};
use serde::{Deserialize, Serialize};

pub use correlation::Correlation;
pub use descriptive::DescriptiveStats;
pub use outliers::OutlierReport;
pub use quality::DataQuality;
pub use trend::{Trend, TrendDirection};

/// Absolute coefficient above which a correlation is called out as strong
const STRONG_CORRELATION: f64 = 0.7;

/// A suggested chart derived from the data shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartHint {
    pub title: String,
    /// "line", "bar" or "scatter"
    pub chart_type: String,
    pub x_column: String,
    pub y_column: String,
}

/// Everything the analyzer knows about one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub descriptive: Vec<DescriptiveStats>,
    pub correlations: Vec<Correlation>,
    pub trends: Vec<Trend>,
    pub outliers: Vec<OutlierReport>,
    /// Derived, human-readable observations
    pub insights: Vec<String>,
    pub chart_hints: Vec<ChartHint>,
    pub quality: DataQuality,
}

/// Analyze a dataset.
///
/// Pure function of the dataset: calling it twice on the same immutable
/// dataset yields identical results. Malformed cells never fail the
/// analysis; they are excluded per-computation and reflected in the
/// quality score.
pub fn analyze(dataset: &Dataset) -> Result<AnalysisResult, DomainError> {
    if dataset.columns().is_empty() || dataset.row_count() == 0 {
        // Dataset construction already rejects this, but analyze() is the
        // contract boundary, so it re-checks.
        return Err(DomainError::InvalidDataset(
            "empty dataset cannot be analyzed".to_string(),
        ));
    }

    let descriptive: Vec<DescriptiveStats> = dataset
        .numeric_columns()
        .into_iter()
        .filter_map(descriptive::describe)
        .collect();
    let correlations = correlation::pairwise(dataset);
    let trends = trend::trends(dataset);
    let outliers = outliers::detect(dataset);
    let quality = quality::assess(dataset);

    let insights = derive_insights(&descriptive, &correlations, &trends, &outliers, &quality);
    let chart_hints = derive_chart_hints(dataset, &correlations, &trends);

    Ok(AnalysisResult {
        descriptive,
        correlations,
        trends,
        outliers,
        insights,
        chart_hints,
        quality,
    })
}

fn derive_insights(
    descriptive: &[DescriptiveStats],
    correlations: &[Correlation],
    trends: &[Trend],
    outliers: &[OutlierReport],
    quality: &DataQuality,
) -> Vec<String> {
    let mut insights = Vec::new();

    for trend in trends {
        insights.push(format!(
            "'{}' is {} ({:+.1}% from first to last observation)",
            trend.column,
            trend.direction.as_str(),
            trend.relative_change * 100.0
        ));
    }

    if let Some(strongest) = correlations
        .iter()
        .max_by(|a, b| a.coefficient.abs().total_cmp(&b.coefficient.abs()))
        && strongest.coefficient.abs() >= STRONG_CORRELATION
    {
        let direction = if strongest.coefficient > 0.0 {
            "positively"
        } else {
            "negatively"
        };
        insights.push(format!(
            "'{}' and '{}' are strongly {} correlated (r = {:.2})",
            strongest.column_a, strongest.column_b, direction, strongest.coefficient
        ));
    }

    for report in outliers {
        insights.push(format!(
            "'{}' contains {} outlier(s) outside [{:.1}, {:.1}]",
            report.column,
            report.values.len(),
            report.lower_fence,
            report.upper_fence
        ));
    }

    for stats in descriptive {
        if stats.std_dev > 0.0 && stats.mean != 0.0 {
            let cv = stats.std_dev / stats.mean.abs();
            if cv > 1.0 {
                insights.push(format!(
                    "'{}' is highly dispersed (std-dev exceeds the mean)",
                    stats.column
                ));
            }
        }
    }

    if quality.is_low() {
        insights.push(format!(
            "data quality is low ({:.0}/100); findings should be caveated",
            quality.score
        ));
    }

    insights
}

fn derive_chart_hints(
    dataset: &Dataset,
    correlations: &[Correlation],
    trends: &[Trend],
) -> Vec<ChartHint> {
    let mut hints = Vec::new();

    // Time series get line charts
    if let Some(date_column) = dataset.date_columns().into_iter().next() {
        for trend in trends {
            hints.push(ChartHint {
                title: format!("{} over time", trend.column),
                chart_type: "line".to_string(),
                x_column: date_column.name().to_string(),
                y_column: trend.column.clone(),
            });
        }
    }

    // Strongly correlated pairs get scatter plots
    for correlation in correlations {
        if correlation.coefficient.abs() >= STRONG_CORRELATION {
            hints.push(ChartHint {
                title: format!("{} vs {}", correlation.column_a, correlation.column_b),
                chart_type: "scatter".to_string(),
                x_column: correlation.column_a.clone(),
                y_column: correlation.column_b.clone(),
            });
        }
    }

    // First categorical × numeric pairing gets a bar chart
    let categorical = dataset
        .columns()
        .iter()
        .find(|c| c.kind() == ColumnKind::Categorical);
    let numeric = dataset.numeric_columns();
    if let (Some(cat), Some(num)) = (categorical, numeric.first()) {
        hints.push(ChartHint {
            title: format!("{} by {}", num.name(), cat.name()),
            chart_type: "bar".to_string(),
            x_column: cat.name().to_string(),
            y_column: num.name().to_string(),
        });
    }

    hints
}
