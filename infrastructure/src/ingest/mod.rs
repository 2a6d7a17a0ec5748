//! Dataset ingestion
//!
//! Converts externally supplied JSON (an array of flat objects, one per
//! row) into the normalized [`Dataset`]. Column order follows first
//! appearance across the rows; rows missing a key get a missing cell.

use serde_json::Value;
use slideforge_domain::{CellValue, Dataset, DomainError};

/// Build a dataset from a JSON array of row objects
pub fn dataset_from_json(text: &str) -> Result<Dataset, DomainError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| DomainError::InvalidDataset(format!("malformed JSON: {e}")))?;
    dataset_from_value(&value)
}

/// Build a dataset from an already-parsed JSON value
pub fn dataset_from_value(value: &Value) -> Result<Dataset, DomainError> {
    let rows = value
        .as_array()
        .ok_or_else(|| DomainError::InvalidDataset("expected a JSON array of rows".to_string()))?;

    let mut names: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let object = row.as_object().ok_or_else(|| {
            DomainError::InvalidDataset(format!("row {i} is not a JSON object"))
        })?;
        for key in object.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let cells = rows
        .iter()
        .map(|row| {
            names
                .iter()
                .map(|name| cell_from_value(row.get(name)))
                .collect()
        })
        .collect();

    Dataset::new(names, cells)
}

fn cell_from_value(value: Option<&Value>) -> CellValue {
    match value {
        None | Some(Value::Null) => CellValue::Missing,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Missing,
        },
        Some(Value::String(s)) => CellValue::Text(s.clone()),
        Some(Value::Bool(b)) => CellValue::Text(b.to_string()),
        // Nested structures are opaque; keep their text so nothing is
        // silently lost
        Some(other) => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slideforge_domain::ColumnKind;

    #[test]
    fn test_rows_become_columns_in_first_seen_order() {
        let dataset = dataset_from_json(
            r#"[
                {"date": "2024-01-31", "revenue": 100},
                {"date": "2024-02-29", "revenue": 110, "region": "north"}
            ]"#,
        )
        .unwrap();

        let names: Vec<&str> = dataset.columns().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["date", "revenue", "region"]);
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column("date").unwrap().kind(), ColumnKind::Date);
        assert_eq!(dataset.column("revenue").unwrap().kind(), ColumnKind::Numeric);

        // The first row has no region
        assert!(dataset.column("region").unwrap().values()[0].is_missing());
    }

    #[test]
    fn test_null_and_bool_cells() {
        let dataset = dataset_from_json(
            r#"[
                {"active": true, "score": null},
                {"active": false, "score": 3.5}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            dataset.column("active").unwrap().values()[0],
            CellValue::Text("true".to_string())
        );
        assert!(dataset.column("score").unwrap().values()[0].is_missing());
        assert_eq!(
            dataset.column("score").unwrap().values()[1],
            CellValue::Number(3.5)
        );
    }

    #[test]
    fn test_non_array_input_rejected() {
        let err = dataset_from_json(r#"{"rows": []}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDataset(_)));

        let err = dataset_from_json("[]").unwrap_err();
        assert!(matches!(err, DomainError::InvalidDataset(_)));

        let err = dataset_from_json("not json").unwrap_err();
        assert!(matches!(err, DomainError::InvalidDataset(_)));
    }

    #[test]
    fn test_row_that_is_not_an_object_rejected() {
        let err = dataset_from_json(r#"[{"a": 1}, 42]"#).unwrap_err();
        match err {
            DomainError::InvalidDataset(msg) => assert!(msg.contains("row 1")),
            other => panic!("expected InvalidDataset, got {other:?}"),
        }
    }
}
