//! OAuth2 authentication for Google APIs.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{GoogleError, Result};
use crate::models::{AuthorizedUserCredentials, ServiceAccountCredentials, TokenResponse};

/// Google OAuth2 token endpoint.
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: [&str; 3] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive.file",
    "https://www.googleapis.com/auth/drive",
];

/// Lifetime requested for service account assertions.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Tokens are refreshed this long before they expire.
const EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// JWT claims for service account authentication.
#[derive(Debug, Serialize)]
struct Claims {
    iss: String,   // Issuer (service account email)
    scope: String, // Space separated OAuth scopes
    aud: String,   // Audience (token endpoint)
    exp: u64,      // Expiration time
    iat: u64,      // Issued at
}

/// Credentials an [`Authenticator`] can exchange for access tokens.
#[derive(Debug)]
pub enum Credentials {
    ServiceAccount(ServiceAccountCredentials),
    AuthorizedUser(AuthorizedUserCredentials),
    /// A pre-issued token that is used as is and never refreshed.
    AccessToken(String),
}

impl Credentials {
    /// Parse a credentials JSON document.
    ///
    /// `"type": "authorized_user"` selects the refresh token flow; anything
    /// else is read as a service account key.
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(content)?;

        match value.get("type").and_then(|t| t.as_str()) {
            Some("authorized_user") => Ok(Self::AuthorizedUser(serde_json::from_value(value)?)),
            Some("service_account") | None => {
                Ok(Self::ServiceAccount(serde_json::from_value(value)?))
            }
            Some(other) => Err(GoogleError::UnsupportedCredentials(other.to_string())),
        }
    }
}

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Authenticator for Google APIs.
#[derive(Clone)]
pub struct Authenticator {
    credentials: Arc<Credentials>,
    scopes: Vec<String>,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl Authenticator {
    /// Create a new authenticator from a credentials JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(Self::new(Credentials::from_json(&content)?))
    }

    /// Create an authenticator that always hands out `token`.
    pub fn from_access_token(token: impl Into<String>) -> Self {
        Self::new(Credentials::AccessToken(token.into()))
    }

    /// Create a new authenticator from credentials.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            scopes: DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect(),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    /// Replace the requested OAuth scopes.
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Get a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        if let Credentials::AccessToken(token) = self.credentials.as_ref() {
            return Ok(token.clone());
        }

        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + EXPIRY_BUFFER {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let new_token = self.refresh_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    async fn refresh_token(&self) -> Result<CachedToken> {
        let response = match self.credentials.as_ref() {
            Credentials::ServiceAccount(sa) => {
                let token_uri = sa.token_uri.as_deref().unwrap_or(TOKEN_URI);
                let jwt = self.service_account_assertion(sa, token_uri)?;
                debug!(client_email = %sa.client_email, "requesting service account token");

                let params = [
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", jwt.as_str()),
                ];
                self.client.post(token_uri).form(&params).send().await?
            }
            Credentials::AuthorizedUser(user) => {
                let token_uri = user.token_uri.as_deref().unwrap_or(TOKEN_URI);
                debug!(client_id = %user.client_id, "refreshing user token");

                let params = [
                    ("grant_type", "refresh_token"),
                    ("client_id", user.client_id.as_str()),
                    ("client_secret", user.client_secret.as_str()),
                    ("refresh_token", user.refresh_token.as_str()),
                ];
                self.client.post(token_uri).form(&params).send().await?
            }
            Credentials::AccessToken(token) => {
                return Ok(CachedToken {
                    access_token: token.clone(),
                    expires_at: SystemTime::now() + Duration::from_secs(ASSERTION_LIFETIME_SECS),
                });
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GoogleError::TokenRefreshError(format!(
                "Status {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }

    /// Sign the JWT bearer assertion for a service account.
    fn service_account_assertion(
        &self,
        sa: &ServiceAccountCredentials,
        token_uri: &str,
    ) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| GoogleError::AuthenticationError(e.to_string()))?
            .as_secs();

        let claims = Claims {
            iss: sa.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: token_uri.to_string(),
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(sa.private_key.as_bytes())?;
        Ok(encode(&header, &claims, &key)?)
    }
}
