//! Normalized tabular dataset (Value Objects)
//!
//! A [`Dataset`] is an immutable, column-oriented view of the rows handed
//! over by the ingestion collaborator. Column semantic kinds are inferred
//! once at construction and cached for the dataset's lifetime.

use crate::core::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    /// Interpret this cell as a finite number, if possible.
    ///
    /// Text cells are parsed leniently (surrounding whitespace ignored);
    /// malformed values simply yield `None`, never an error.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Interpret this cell as a calendar date, if possible
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// A cell counts as missing when it is null-like or an empty string
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// Parse a date from the formats the ingestion layer commonly produces
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d);
        }
    }
    // RFC 3339 timestamps reduce to their date component
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

/// Semantic kind of a column, inferred once per dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Date,
}

impl ColumnKind {
    pub fn as_str(&self) -> &str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Categorical => "categorical",
            ColumnKind::Date => "date",
        }
    }
}

/// How many values are sampled when classifying a column
const CLASSIFY_SAMPLE: usize = 10;

/// Fraction of the sample that must parse as finite numbers for a column
/// to be classified numeric
const NUMERIC_THRESHOLD: f64 = 0.9;

/// A named column with its cached kind and values in row order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    values: Vec<CellValue>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// All values that parse as finite numbers, in row order
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(CellValue::as_number).collect()
    }

    /// Classify a column from its values.
    ///
    /// A column is a date column when its first non-missing value parses as
    /// a date. Otherwise it is numeric when at least 90% of a sample of up
    /// to ten non-missing values parse as finite numbers, else categorical.
    fn classify(values: &[CellValue]) -> ColumnKind {
        if let Some(first) = values.iter().find(|v| !v.is_missing())
            && first.as_date().is_some()
        {
            return ColumnKind::Date;
        }

        let sample: Vec<&CellValue> = values
            .iter()
            .filter(|v| !v.is_missing())
            .take(CLASSIFY_SAMPLE)
            .collect();
        if sample.is_empty() {
            return ColumnKind::Categorical;
        }

        let numeric = sample.iter().filter(|v| v.as_number().is_some()).count();
        if numeric as f64 / sample.len() as f64 >= NUMERIC_THRESHOLD {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }
}

/// An immutable tabular dataset owned by a single pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset from column names and row-major values.
    ///
    /// Every row must have exactly one value per column. Column kinds are
    /// inferred here and never change afterwards.
    pub fn new(names: Vec<String>, rows: Vec<Vec<CellValue>>) -> Result<Self, DomainError> {
        if names.is_empty() {
            return Err(DomainError::InvalidDataset("no columns".to_string()));
        }
        if rows.is_empty() {
            return Err(DomainError::InvalidDataset("no rows".to_string()));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != names.len() {
                return Err(DomainError::InvalidDataset(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    names.len()
                )));
            }
        }

        let row_count = rows.len();
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<CellValue> =
                    rows.iter().map(|row| row[idx].clone()).collect();
                let kind = Column::classify(&values);
                Column { name, kind, values }
            })
            .collect();

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns classified numeric, in declaration order
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Numeric)
            .collect()
    }

    /// Columns classified as dates, in declaration order
    pub fn date_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Date)
            .collect()
    }
}
