//! A spreadsheet range that can be narrowed and then read or written.

use serde_json::Value;
use tracing::debug;

use super::a1::{SheetSlice, DEFAULT_SHEET_NAME};
use super::client::Sheets;
use super::models::{
    AppendValuesResponse, ClearValuesResponse, InsertDataOption, UpdateValuesResponse,
    ValueInputOption, ValueRange, ValueRenderOption,
};
use super::table::Table;
use crate::error::Result;
use crate::url_parser::extract_id;

/// A range within one spreadsheet.
///
/// ```no_run
/// # async fn run(sheets: gapiutils::Sheets) -> gapiutils::Result<()> {
/// let data = sheets.value_range("1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms")?;
/// let last_row = data.slice(gapiutils::SheetSlice::sheet("Data").rows(-1));
/// println!("{:?}", last_row.values().await?.values);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SheetsValueRange {
    sheets: Sheets,
    spreadsheet_id: String,
    slice: SheetSlice,
    pub value_render_option: ValueRenderOption,
    pub value_input_option: ValueInputOption,
    pub insert_data_option: InsertDataOption,
}

impl SheetsValueRange {
    pub fn new(sheets: Sheets, spreadsheet_id: &str) -> Result<Self> {
        Ok(Self {
            sheets,
            spreadsheet_id: extract_id(spreadsheet_id)?,
            slice: SheetSlice::new(),
            value_render_option: ValueRenderOption::default(),
            value_input_option: ValueInputOption::default(),
            insert_data_option: InsertDataOption::default(),
        })
    }

    pub fn with_render_option(mut self, option: ValueRenderOption) -> Self {
        self.value_render_option = option;
        self
    }

    pub fn with_input_option(mut self, option: ValueInputOption) -> Self {
        self.value_input_option = option;
        self
    }

    pub fn with_insert_option(mut self, option: InsertDataOption) -> Self {
        self.insert_data_option = option;
        self
    }

    pub fn spreadsheet_id(&self) -> &str {
        &self.spreadsheet_id
    }

    pub fn sheet_slice(&self) -> &SheetSlice {
        &self.slice
    }

    /// A new range narrowed by `slice`. Accepts a [`SheetSlice`] or a sheet name.
    pub fn slice(&self, slice: impl Into<SheetSlice>) -> Self {
        Self {
            slice: self.slice.slice(&slice.into()),
            ..self.clone()
        }
    }

    /// The slice with the default sheet filled in.
    fn effective_slice(&self) -> SheetSlice {
        match self.slice.sheet_name() {
            Some(_) => self.slice.clone(),
            None => self.slice.clone().in_sheet(DEFAULT_SHEET_NAME),
        }
    }

    /// A1 range of this view, without looking up the sheet's size.
    ///
    /// Fails for negative or open-ended selections; use
    /// [`resolve_range`](Self::resolve_range) for those.
    pub fn range_name(&self) -> Result<String> {
        self.effective_slice().to_a1(None)
    }

    /// A1 range of this view, fetching the sheet's size when the selection needs it.
    pub async fn resolve_range(&self) -> Result<String> {
        let slice = self.effective_slice();
        if !slice.needs_grid() {
            return slice.to_a1(None);
        }

        let grid = self
            .sheets
            .grid_size(&self.spreadsheet_id, slice.sheet_name())
            .await?;
        debug!(rows = grid.rows, cols = grid.cols, "resolved sheet grid size");
        slice.to_a1(Some(grid))
    }

    pub async fn values(&self) -> Result<ValueRange> {
        let range = self.resolve_range().await?;
        self.sheets
            .values(&self.spreadsheet_id, &range, self.value_render_option)
            .await
    }

    /// The values as a [`Table`], first row as header. `None` when the range is empty.
    pub async fn to_table(&self) -> Result<Option<Table>> {
        Ok(Table::from_value_range(&self.values().await?))
    }

    pub async fn update(&self, values: Vec<Vec<Value>>) -> Result<UpdateValuesResponse> {
        let range = self.resolve_range().await?;
        self.sheets
            .update(&self.spreadsheet_id, &range, values, self.value_input_option)
            .await
    }

    /// Write a table, header row first, starting at the top-left of this range.
    pub async fn update_table(&self, table: &Table) -> Result<UpdateValuesResponse> {
        self.update(table.to_values()).await
    }

    pub async fn append(&self, values: Vec<Vec<Value>>) -> Result<AppendValuesResponse> {
        let range = self.resolve_range().await?;
        self.sheets
            .append(
                &self.spreadsheet_id,
                &range,
                values,
                self.insert_data_option,
                self.value_input_option,
            )
            .await
    }

    pub async fn clear(&self) -> Result<ClearValuesResponse> {
        let range = self.resolve_range().await?;
        self.sheets.clear(&self.spreadsheet_id, &range).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authenticator;

    fn view() -> SheetsValueRange {
        let sheets = Sheets::new(Authenticator::from_access_token("token"));
        SheetsValueRange::new(sheets, "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms").unwrap()
    }

    #[test]
    fn test_default_sheet_name() {
        assert_eq!(view().range_name().unwrap(), "'Sheet1'");
    }

    #[test]
    fn test_slice_keeps_outer_sheet() {
        let data = view().slice("Data");
        let cells = data.slice(SheetSlice::new().rows(2..=3).cols(1..=2));
        assert_eq!(cells.range_name().unwrap(), "'Data'!A2:B3");
    }

    #[test]
    fn test_negative_index_needs_resolution() {
        let last = view().slice(SheetSlice::new().rows(-1));
        assert!(last.range_name().is_err());
        assert!(last.effective_slice().needs_grid());
    }
}
