//! Google Sheets: values client, A1 range notation and range views.

pub mod a1;
pub mod client;
pub mod models;
pub mod table;
pub mod value_range;

pub use a1::{GridSize, SheetSlice, Span, DEFAULT_SHEET_NAME};
pub use client::{chunk_values, Sheets, Values, UPDATE_CHUNK_SIZE};
pub use models::{InsertDataOption, ValueInputOption, ValueRange, ValueRenderOption};
pub use table::Table;
pub use value_range::SheetsValueRange;
