//! gapiutils - Convenience wrappers for Google Drive, Sheets and Geocoding.
//!
//! This library provides functionality to:
//! - List, upload, download and copy Drive files, and manage folders and permissions
//! - Read, write, append and clear spreadsheet values, with batched updates
//! - Translate between row/column indices and A1 range notation
//!
//! # Example
//!
//! ```no_run
//! use gapiutils::{Authenticator, Drive, SheetSlice, Sheets};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_file("service-account.json")?;
//!
//!     let drive = Drive::new(auth.clone());
//!     for file in drive.list_children("folder-id").await? {
//!         println!("{}", file);
//!     }
//!
//!     let sheets = Sheets::new(auth);
//!     let header = sheets
//!         .value_range("spreadsheet-id")?
//!         .slice(SheetSlice::sheet("Data").rows(1));
//!     println!("{:?}", header.values().await?.values);
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod drive;
pub mod error;
pub mod geocode;
pub mod mime;
pub mod models;
pub mod sheets;
pub mod url_parser;

// Re-exports for convenience
pub use auth::{Authenticator, Credentials};
pub use drive::Drive;
pub use error::{GoogleError, Result};
pub use geocode::Geocode;
pub use mime::GoogleMimeType;
pub use models::{FileMetadata, Permission};
pub use sheets::{SheetSlice, Sheets, SheetsValueRange};
pub use url_parser::extract_id;
