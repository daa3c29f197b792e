//! Error types for the gapiutils crate.

use thiserror::Error;

use crate::models::ApiErrorResponse;

/// Errors that can occur when interacting with Google Drive and Sheets.
#[derive(Error, Debug)]
pub enum GoogleError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Failed to read credentials file: {0}")]
    CredentialsFileError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported credentials: {0}")]
    UnsupportedCredentials(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("JWT encoding error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Token refresh failed: {0}")]
    TokenRefreshError(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),
}

/// Result type alias for GoogleError.
pub type Result<T> = std::result::Result<T, GoogleError>;

/// Pass successful responses through, decoding Google's error envelope otherwise.
pub(crate) async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(GoogleError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(GoogleError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}
