//! Header-plus-rows view of sheet values.

use serde_json::{Map, Value};

use super::models::ValueRange;

/// Rows of values under a header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Render a cell as the text the spreadsheet would show; `null` is empty.
pub fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from a value range whose first row is the header.
    ///
    /// Returns `None` when there are no values. Short rows are padded with
    /// empty strings; the header grows to the widest row.
    pub fn from_value_range(values: &ValueRange) -> Option<Self> {
        let (header, body) = values.values.split_first()?;

        let mut columns: Vec<String> = header.iter().map(cell_to_string).collect();
        let width = body.iter().map(Vec::len).max().unwrap_or(0).max(columns.len());
        for ix in columns.len()..width {
            columns.push(ix.to_string());
        }

        let rows = body
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, Value::String(String::new()));
                row
            })
            .collect();

        Some(Self { columns, rows })
    }

    /// Header plus rows, every cell converted to a string.
    pub fn to_values(&self) -> Vec<Vec<Value>> {
        let header: Vec<Value> = self.columns.iter().cloned().map(Value::String).collect();

        std::iter::once(header)
            .chain(self.rows.iter().map(|row| {
                row.iter()
                    .map(|v| Value::String(cell_to_string(v)))
                    .collect()
            }))
            .collect()
    }

    /// Position of a column by header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let ix = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|row| row.get(ix)).collect())
    }

    /// Rows as JSON objects keyed by column name.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value_range(values: Value) -> ValueRange {
        ValueRange {
            values: serde_json::from_value(values).unwrap(),
            ..ValueRange::default()
        }
    }

    #[test]
    fn test_from_value_range_pads_short_rows() {
        let table = Table::from_value_range(&value_range(json!([
            ["name", "age", "city"],
            ["ada", 36],
            ["alan", 41, "London"]
        ])))
        .unwrap();

        assert_eq!(table.columns, vec!["name", "age", "city"]);
        assert_eq!(table.rows[0], vec![json!("ada"), json!(36), json!("")]);
        assert_eq!(table.column("city").unwrap(), vec![&json!(""), &json!("London")]);
    }

    #[test]
    fn test_from_value_range_empty() {
        assert!(Table::from_value_range(&ValueRange::default()).is_none());
    }

    #[test]
    fn test_to_values_stringifies_cells() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![json!(1.5), Value::Null], vec![json!(true), json!("x")]],
        );

        assert_eq!(
            table.to_values(),
            vec![
                vec![json!("a"), json!("b")],
                vec![json!("1.5"), json!("")],
                vec![json!("true"), json!("x")],
            ]
        );
    }

    #[test]
    fn test_records() {
        let table = Table::new(vec!["k".into()], vec![vec![json!("v")]]);
        let records = table.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["k"], json!("v"));
    }
}
