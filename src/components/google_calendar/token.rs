use crate::error::{google_calendar_error, ServiceResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Google's OAuth token endpoint
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Calendar scope requested when authorizing
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Tokens expiring sooner than this are refreshed before use
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Authorized-user credentials as written by the installed-app flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    /// Current access token
    #[serde(default)]
    pub token: Option<String>,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    /// When the access token stops being valid
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_uri: Option<String>,
    /// Fields we do not interpret but keep when rewriting the file
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthorizedUser {
    /// The access token, if it is still usable at `now`
    pub fn valid_access_token(&self, now: DateTime<Utc>) -> Option<&str> {
        let token = self.token.as_deref()?;
        let expiry = self.expiry?;

        if expiry - now > Duration::seconds(EXPIRY_MARGIN_SECS) {
            Some(token)
        } else {
            None
        }
    }

    /// Store a newly granted access token
    pub fn apply_grant(&mut self, grant: TokenGrant, now: DateTime<Utc>) {
        self.token = Some(grant.access_token);
        self.expiry = Some(now + Duration::seconds(grant.expires_in.unwrap_or(3600)));
        if let Some(refresh_token) = grant.refresh_token {
            self.refresh_token = refresh_token;
        }
    }
}

/// Token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Reads credentials from the token file, refreshing them when expired
///
/// Nothing is cached between calls: every call reads the file again.
#[derive(Debug, Clone)]
pub struct TokenManager {
    path: PathBuf,
    client: Client,
}

impl TokenManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            client: Client::new(),
        }
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a usable access token, refreshing it if needed
    pub async fn get_token(&self) -> ServiceResult<String> {
        let mut credentials = self.load().await?;
        let now = Utc::now();

        if let Some(token) = credentials.valid_access_token(now) {
            return Ok(token.to_string());
        }

        warn!("Google access token expired or missing, refreshing");
        let grant = self.refresh_token(&credentials).await?;
        credentials.apply_grant(grant, now);
        self.save(&credentials).await?;

        credentials
            .token
            .ok_or_else(|| google_calendar_error("Token refresh returned no access token"))
    }

    /// Read credentials from the token file
    pub async fn load(&self) -> ServiceResult<AuthorizedUser> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            google_calendar_error(&format!(
                "Failed to read token file {}: {}. Run get_calendar_token first.",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| google_calendar_error(&format!("Failed to parse token file: {}", e)))
    }

    /// Write credentials to the token file
    ///
    /// The content goes to a sibling temporary file first and is renamed over
    /// the token file, so concurrent readers see either the old or the new
    /// credentials, never a partial file.
    pub async fn save(&self, credentials: &AuthorizedUser) -> ServiceResult<()> {
        let content = serde_json::to_string_pretty(credentials)?;
        let staging = self.staging_path();

        tokio::fs::write(&staging, content).await?;
        if let Err(e) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        info!("Saved Google credentials to {}", self.path.display());
        Ok(())
    }

    /// Unique temporary file next to the token file
    fn staging_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_string());

        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4().simple()))
    }

    /// Exchange the refresh token for a new access token
    async fn refresh_token(&self, credentials: &AuthorizedUser) -> ServiceResult<TokenGrant> {
        let token_uri = credentials.token_uri.as_deref().unwrap_or(TOKEN_URI);

        let params = [
            ("client_id", credentials.client_id.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
            ("refresh_token", credentials.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))
    }
}
