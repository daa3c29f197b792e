//! Google Sheets API v4 client.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::a1::{number_to_a1, GridSize};
use super::models::{
    AppendValuesResponse, BatchUpdateValuesResponse, ClearValuesResponse, InsertDataOption,
    Spreadsheet, UpdateValuesResponse, ValueInputOption, ValueRange, ValueRenderOption,
};
use super::value_range::SheetsValueRange;
use crate::auth::Authenticator;
use crate::error::{error_for_status, GoogleError, Result};
use crate::url_parser::extract_id;

/// Base URL for Google Sheets API v4.
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// Rows per request in [`Sheets::update_chunked`].
pub const UPDATE_CHUNK_SIZE: usize = 100;

/// A grid of cell values, row-major.
pub type Values = Vec<Vec<Value>>;

/// Pending `(range, values)` updates, in insertion order.
type Batch = Vec<(String, Values)>;

/// Split `values` into row chunks, each with the A1 range it covers.
///
/// `row` and `col` are 0-based offsets of the top-left cell.
pub fn chunk_values(
    values: &[Vec<Value>],
    row: u32,
    col: u32,
    chunk_size: usize,
) -> Result<Vec<(String, Values)>> {
    if chunk_size == 0 {
        return Err(GoogleError::InvalidRange("chunk size must be positive".into()));
    }

    let mut start_row = row + 1;
    let mut chunks = Vec::new();

    for chunk in values.chunks(chunk_size) {
        let width = chunk.iter().map(Vec::len).max().unwrap_or(0).max(1) as u32;
        let end_row = start_row + chunk.len() as u32 - 1;

        let range = format!(
            "{}:{}",
            number_to_a1(start_row, col + 1, None)?,
            number_to_a1(end_row, col + width, None)?
        );
        chunks.push((range, chunk.to_vec()));
        start_row = end_row + 1;
    }

    Ok(chunks)
}

/// Client for interacting with Google Sheets.
#[derive(Clone)]
pub struct Sheets {
    auth: Authenticator,
    http: Client,
    base_url: String,
    batched: Arc<Mutex<HashMap<String, Batch>>>,
}

impl Sheets {
    /// Create a new Sheets client.
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: SHEETS_API_BASE.to_string(),
            batched: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Override the Sheets API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// A range view over one spreadsheet.
    pub fn value_range(&self, spreadsheet_id: &str) -> Result<SheetsValueRange> {
        SheetsValueRange::new(self.clone(), spreadsheet_id)
    }

    fn values_url(&self, spreadsheet_id: &str, range_name: &str, suffix: &str) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}{}",
            self.base_url,
            spreadsheet_id,
            urlencoding::encode(range_name),
            suffix
        )
    }

    /// Create an empty spreadsheet.
    pub async fn create(&self, title: &str) -> Result<Spreadsheet> {
        let token = self.auth.get_access_token().await?;

        info!(title, "creating spreadsheet");
        let response = self
            .http
            .post(format!("{}/spreadsheets", self.base_url))
            .bearer_auth(&token)
            .json(&json!({ "properties": { "title": title } }))
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Get spreadsheet metadata, including each sheet's properties.
    pub async fn get(&self, spreadsheet_id: &str) -> Result<Spreadsheet> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;
        let token = self.auth.get_access_token().await?;

        debug!(%spreadsheet_id, "getting spreadsheet");
        let response = self
            .http
            .get(format!("{}/spreadsheets/{}", self.base_url, spreadsheet_id))
            .bearer_auth(&token)
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Row and column counts of a sheet (the first sheet when `sheet_name` is `None`).
    pub async fn grid_size(&self, spreadsheet_id: &str, sheet_name: Option<&str>) -> Result<GridSize> {
        let spreadsheet = self.get(spreadsheet_id).await?;
        let missing = || GoogleError::SheetNotFound(sheet_name.unwrap_or("<first>").to_string());

        spreadsheet
            .sheet(sheet_name)
            .ok_or_else(missing)?
            .properties
            .grid_size()
            .ok_or_else(missing)
    }

    /// Read the values of a range.
    pub async fn values(
        &self,
        spreadsheet_id: &str,
        range_name: &str,
        value_render_option: ValueRenderOption,
    ) -> Result<ValueRange> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;
        let token = self.auth.get_access_token().await?;

        debug!(%spreadsheet_id, range_name, "reading values");
        let response = self
            .http
            .get(self.values_url(&spreadsheet_id, range_name, ""))
            .bearer_auth(&token)
            .query(&[("valueRenderOption", value_render_option.as_str())])
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Overwrite a range with `values`.
    pub async fn update(
        &self,
        spreadsheet_id: &str,
        range_name: &str,
        values: Values,
        value_input_option: ValueInputOption,
    ) -> Result<UpdateValuesResponse> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;
        let token = self.auth.get_access_token().await?;

        debug!(%spreadsheet_id, range_name, rows = values.len(), "updating values");
        let response = self
            .http
            .put(self.values_url(&spreadsheet_id, range_name, ""))
            .bearer_auth(&token)
            .query(&[("valueInputOption", value_input_option.as_str())])
            .json(&ValueRange {
                values,
                ..ValueRange::default()
            })
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Write many ranges in one request.
    pub async fn batch_update(
        &self,
        spreadsheet_id: &str,
        data: Vec<(String, Values)>,
        value_input_option: ValueInputOption,
    ) -> Result<BatchUpdateValuesResponse> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;
        let token = self.auth.get_access_token().await?;

        let data: Vec<ValueRange> = data
            .into_iter()
            .map(|(range, values)| ValueRange {
                range: Some(range),
                major_dimension: None,
                values,
            })
            .collect();

        info!(%spreadsheet_id, ranges = data.len(), "batch updating values");
        let response = self
            .http
            .post(format!(
                "{}/spreadsheets/{}/values:batchUpdate",
                self.base_url, spreadsheet_id
            ))
            .bearer_auth(&token)
            .json(&json!({
                "valueInputOption": value_input_option,
                "data": data,
            }))
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Queue an update, sending the spreadsheet's queue as one batch once it
    /// holds `auto_batch_size` ranges.
    ///
    /// Queuing the same range twice keeps only the latest values. Returns the
    /// batch response when a batch was sent with `value_input_option`.
    pub async fn update_batched(
        &self,
        spreadsheet_id: &str,
        range_name: &str,
        values: Values,
        auto_batch_size: usize,
        value_input_option: ValueInputOption,
    ) -> Result<Option<BatchUpdateValuesResponse>> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;

        let pending = {
            let mut batched = self.batched.lock().await;
            let batch = batched.entry(spreadsheet_id.clone()).or_default();

            match batch.iter_mut().find(|(range, _)| range == range_name) {
                Some(entry) => entry.1 = values,
                None => batch.push((range_name.to_string(), values)),
            }
            batch.len()
        };

        if pending >= auto_batch_size {
            self.flush(&spreadsheet_id, value_input_option).await
        } else {
            debug!(%spreadsheet_id, pending, auto_batch_size, "queued update");
            Ok(None)
        }
    }

    /// Send the queued updates of one spreadsheet.
    pub async fn flush(
        &self,
        spreadsheet_id: &str,
        value_input_option: ValueInputOption,
    ) -> Result<Option<BatchUpdateValuesResponse>> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;

        let batch = {
            let mut batched = self.batched.lock().await;
            batched.remove(&spreadsheet_id).unwrap_or_default()
        };
        if batch.is_empty() {
            return Ok(None);
        }

        match self
            .batch_update(&spreadsheet_id, batch.clone(), value_input_option)
            .await
        {
            Ok(response) => Ok(Some(response)),
            Err(e) => {
                warn!(%spreadsheet_id, error = %e, "batch update failed, requeueing");
                let mut batched = self.batched.lock().await;
                let queue = batched.entry(spreadsheet_id).or_default();
                for (range, values) in batch.into_iter().rev() {
                    if !queue.iter().any(|(r, _)| *r == range) {
                        queue.insert(0, (range, values));
                    }
                }
                Err(e)
            }
        }
    }

    /// Send every spreadsheet's queued updates.
    pub async fn flush_all(
        &self,
        value_input_option: ValueInputOption,
    ) -> Result<Vec<BatchUpdateValuesResponse>> {
        let ids: Vec<String> = self.batched.lock().await.keys().cloned().collect();

        let mut responses = Vec::new();
        for id in ids {
            if let Some(response) = self.flush(&id, value_input_option).await? {
                responses.push(response);
            }
        }
        Ok(responses)
    }

    /// Number of updates queued for a spreadsheet.
    pub async fn pending(&self, spreadsheet_id: &str) -> usize {
        let Ok(spreadsheet_id) = extract_id(spreadsheet_id) else {
            return 0;
        };
        self.batched
            .lock()
            .await
            .get(&spreadsheet_id)
            .map_or(0, Vec::len)
    }

    /// Write a large grid starting at `A1` of `sheet_name`, one request per
    /// `chunk_size` rows.
    pub async fn update_chunked(
        &self,
        spreadsheet_id: &str,
        sheet_name: Option<&str>,
        values: Values,
        chunk_size: usize,
    ) -> Result<Vec<UpdateValuesResponse>> {
        let mut responses = Vec::new();

        for (range, chunk) in chunk_values(&values, 0, 0, chunk_size)? {
            let range = super::a1::format_range_name(&range, sheet_name);
            responses.push(
                self.update(spreadsheet_id, &range, chunk, ValueInputOption::default())
                    .await?,
            );
        }

        Ok(responses)
    }

    /// Append rows after the table found in `range_name`.
    pub async fn append(
        &self,
        spreadsheet_id: &str,
        range_name: &str,
        values: Values,
        insert_data_option: InsertDataOption,
        value_input_option: ValueInputOption,
    ) -> Result<AppendValuesResponse> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;
        let token = self.auth.get_access_token().await?;

        debug!(%spreadsheet_id, range_name, rows = values.len(), "appending values");
        let response = self
            .http
            .post(self.values_url(&spreadsheet_id, range_name, ":append"))
            .bearer_auth(&token)
            .query(&[
                ("valueInputOption", value_input_option.as_str()),
                ("insertDataOption", insert_data_option.as_str()),
            ])
            .json(&ValueRange {
                values,
                ..ValueRange::default()
            })
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }

    /// Clear the values of a range, keeping formatting.
    pub async fn clear(&self, spreadsheet_id: &str, range_name: &str) -> Result<ClearValuesResponse> {
        let spreadsheet_id = extract_id(spreadsheet_id)?;
        let token = self.auth.get_access_token().await?;

        info!(%spreadsheet_id, range_name, "clearing values");
        let response = self
            .http
            .post(self.values_url(&spreadsheet_id, range_name, ":clear"))
            .bearer_auth(&token)
            .json(&json!({}))
            .send()
            .await?;

        Ok(error_for_status(response).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: usize, cols: usize) -> Values {
        (0..rows)
            .map(|r| (0..cols).map(|c| json!(r * cols + c)).collect())
            .collect()
    }

    #[test]
    fn test_chunk_values_ranges() {
        let chunks = chunk_values(&grid(250, 3), 0, 0, 100).unwrap();
        let ranges: Vec<&str> = chunks.iter().map(|(r, _)| r.as_str()).collect();
        assert_eq!(ranges, vec!["A1:C100", "A101:C200", "A201:C250"]);
        assert_eq!(chunks[2].1.len(), 50);
    }

    #[test]
    fn test_chunk_values_with_offset() {
        let chunks = chunk_values(&grid(2, 2), 4, 1, 100).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].0, "B5:C6");
    }

    #[test]
    fn test_chunk_values_rejects_zero_chunk() {
        assert!(chunk_values(&grid(1, 1), 0, 0, 0).is_err());
    }
}
