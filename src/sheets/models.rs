//! Data models for Google Sheets API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::a1::GridSize;

/// How input data is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    InputValueOptionUnspecified,
    /// Values are stored as is.
    Raw,
    /// Values are parsed as if typed into the UI (formulas, dates, numbers).
    #[default]
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputValueOptionUnspecified => "INPUT_VALUE_OPTION_UNSPECIFIED",
            Self::Raw => "RAW",
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// How values are rendered in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueRenderOption {
    FormattedValue,
    #[default]
    UnformattedValue,
    Formula,
}

impl ValueRenderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormattedValue => "FORMATTED_VALUE",
            Self::UnformattedValue => "UNFORMATTED_VALUE",
            Self::Formula => "FORMULA",
        }
    }
}

/// How appended data changes the existing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertDataOption {
    #[default]
    Overwrite,
    InsertRows,
}

impl InsertDataOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overwrite => "OVERWRITE",
            Self::InsertRows => "INSERT_ROWS",
        }
    }
}

/// A block of cell values and the range they cover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// Spreadsheet metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub properties: Option<SpreadsheetProperties>,
    #[serde(default)]
    pub sheets: Vec<Sheet>,
    #[serde(default)]
    pub spreadsheet_url: Option<String>,
}

impl Spreadsheet {
    /// Find a sheet by title, or the first sheet when `title` is `None`.
    pub fn sheet(&self, title: Option<&str>) -> Option<&Sheet> {
        match title {
            Some(title) => self.sheets.iter().find(|s| s.properties.title == title),
            None => self.sheets.first(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    pub title: String,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sheet {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: i64,
    #[serde(default)]
    pub grid_properties: Option<GridProperties>,
}

impl SheetProperties {
    pub fn grid_size(&self) -> Option<GridSize> {
        self.grid_properties.as_ref().map(|g| GridSize {
            rows: g.row_count,
            cols: g.column_count,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

/// Response of `values.update`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: u64,
    #[serde(default)]
    pub updated_columns: u64,
    #[serde(default)]
    pub updated_cells: u64,
}

/// Response of `values.batchUpdate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateValuesResponse {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub total_updated_rows: u64,
    #[serde(default)]
    pub total_updated_cells: u64,
    #[serde(default)]
    pub responses: Vec<UpdateValuesResponse>,
}

/// Response of `values.append`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub table_range: Option<String>,
    #[serde(default)]
    pub updates: Option<UpdateValuesResponse>,
}

/// Response of `values.clear`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearValuesResponse {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub cleared_range: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_options_serialize_to_api_names() {
        assert_eq!(
            serde_json::to_value(ValueInputOption::UserEntered).unwrap(),
            json!("USER_ENTERED")
        );
        assert_eq!(
            serde_json::to_value(ValueRenderOption::UnformattedValue).unwrap(),
            json!(ValueRenderOption::UnformattedValue.as_str())
        );
        assert_eq!(InsertDataOption::InsertRows.as_str(), "INSERT_ROWS");
        assert_eq!(
            ValueInputOption::InputValueOptionUnspecified.as_str(),
            "INPUT_VALUE_OPTION_UNSPECIFIED"
        );
    }

    #[test]
    fn test_spreadsheet_sheet_lookup() {
        let spreadsheet: Spreadsheet = serde_json::from_value(json!({
            "spreadsheetId": "abc",
            "sheets": [
                {"properties": {"sheetId": 0, "title": "Sheet1", "index": 0,
                    "gridProperties": {"rowCount": 1000, "columnCount": 26}}},
                {"properties": {"sheetId": 7, "title": "Data", "index": 1}}
            ]
        }))
        .unwrap();

        let first = spreadsheet.sheet(None).unwrap();
        assert_eq!(first.properties.title, "Sheet1");
        assert_eq!(
            first.properties.grid_size(),
            Some(GridSize { rows: 1000, cols: 26 })
        );

        let data = spreadsheet.sheet(Some("Data")).unwrap();
        assert_eq!(data.properties.sheet_id, 7);
        assert!(data.properties.grid_size().is_none());
        assert!(spreadsheet.sheet(Some("Missing")).is_none());
    }
}
