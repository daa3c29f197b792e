//! URL parser for extracting Google Drive IDs from URLs.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{GoogleError, Result};

/// Regex patterns for Google Drive and Docs URLs.
static FOLDER_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-z]+\.google\.com/(?:[^?#]*/)?folders/([a-zA-Z0-9_-]+)")
        .expect("Invalid folder URL regex")
});

static FILE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-z]+\.google\.com/(?:[^?#]*/)?d/([a-zA-Z0-9_-]+)")
        .expect("Invalid file URL regex")
});

static ID_PARAM_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[a-z]+\.google\.com/[^?#]*\?(?:[^#]*&)?id=([a-zA-Z0-9_-]+)")
        .expect("Invalid id parameter regex")
});

/// Valid Google Drive ID pattern (alphanumeric, underscore, hyphen).
static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid ID regex"));

/// Extract a Google Drive ID from a URL or validate a raw ID.
///
/// Supports the following URL formats:
/// - `https://drive.google.com/drive/folders/<ID>`
/// - `https://drive.google.com/drive/u/0/folders/<ID>`
/// - `https://drive.google.com/file/d/<ID>/view`
/// - `https://docs.google.com/spreadsheets/d/<ID>/edit#gid=0`
/// - `https://drive.google.com/open?id=<ID>`
/// - Raw ID string
///
/// # Examples
///
/// ```
/// use gapiutils::url_parser::extract_id;
///
/// let id = extract_id("https://drive.google.com/drive/folders/1abc123").unwrap();
/// assert_eq!(id, "1abc123");
///
/// let id = extract_id("https://docs.google.com/spreadsheets/d/1xyz/edit#gid=0").unwrap();
/// assert_eq!(id, "1xyz");
///
/// let id = extract_id("1abc123").unwrap();
/// assert_eq!(id, "1abc123");
/// ```
pub fn extract_id(url_or_id: &str) -> Result<String> {
    let trimmed = url_or_id.trim();

    for regex in [&*FOLDER_URL_REGEX, &*FILE_URL_REGEX, &*ID_PARAM_REGEX] {
        if let Some(id) = regex.captures(trimmed).and_then(|c| c.get(1)) {
            return Ok(id.as_str().to_string());
        }
    }

    // Check if it's a raw ID
    if ID_REGEX.is_match(trimmed) {
        return Ok(trimmed.to_string());
    }

    Err(GoogleError::InvalidUrlOrId(url_or_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_folder_url() {
        let url = "https://drive.google.com/drive/folders/1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_extract_folder_url_with_user() {
        let url = "https://drive.google.com/drive/u/0/folders/1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");

        let url = "https://drive.google.com/drive/u/2/folders/1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_extract_spreadsheet_url() {
        let url = "https://docs.google.com/spreadsheets/d/1d07HFq7wSbY/edit#gid=0";
        assert_eq!(extract_id(url).unwrap(), "1d07HFq7wSbY");
    }

    #[test]
    fn test_extract_open_url() {
        let url = "https://drive.google.com/open?id=1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");

        let url = "https://drive.google.com/open?usp=sharing&id=1abc123XYZ";
        assert_eq!(extract_id(url).unwrap(), "1abc123XYZ");
    }

    #[test]
    fn test_invalid_url() {
        assert!(extract_id("https://example.com/folder/123").is_err());
        assert!(extract_id("https://example.com/d/123").is_err());
        assert!(extract_id("").is_err());
        assert!(extract_id("   ").is_err());
    }
}
