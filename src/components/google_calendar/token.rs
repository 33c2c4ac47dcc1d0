use super::consent::run_consent_flow;
use super::credentials::{ClientSecrets, DEFAULT_TOKEN_URI};
use crate::config::Config;
use crate::error::{auth_error, SyncResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read-only access to the user's calendars
pub const CALENDAR_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";

/// Tokens this close to their expiry are treated as expired
const EXPIRY_SKEW_SECS: i64 = 60;

/// OAuth credential persisted in the token file.
///
/// Field names follow the authorized-user JSON layout Google's client
/// libraries write, so an existing `token.json` keeps working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    /// Access token
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// Body returned by the OAuth token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: Option<i64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Where a run stands before it can call the Calendar API
#[derive(Debug, PartialEq)]
pub enum CredentialState {
    /// Stored access token can be used as is
    Valid(StoredToken),
    /// Stored access token expired but a refresh token is available
    Refreshable(StoredToken),
    /// Nothing usable is stored; the user has to authorize again
    NeedsConsent,
}

impl StoredToken {
    /// Build a credential from a token endpoint response
    pub fn from_response(response: TokenResponse, secrets: &ClientSecrets, now: DateTime<Utc>) -> Self {
        let scopes = scopes_from(response.scope.as_deref());
        Self {
            token: Some(response.access_token),
            refresh_token: response.refresh_token,
            token_uri: Some(secrets.token_uri.clone()),
            client_id: Some(secrets.client_id.clone()),
            client_secret: Some(secrets.client_secret.clone()),
            scopes,
            expiry: response.expires_in.and_then(|secs| expiry_after(now, secs)),
        }
    }

    /// Merge a refresh response into this credential
    fn refreshed(mut self, response: TokenResponse, now: DateTime<Utc>) -> Self {
        self.token = Some(response.access_token);
        self.expiry = response.expires_in.and_then(|secs| expiry_after(now, secs));
        // Google normally keeps the old refresh token
        if let Some(refresh_token) = response.refresh_token.filter(|t| !t.is_empty()) {
            self.refresh_token = Some(refresh_token);
        }
        if response.scope.is_some() {
            self.scopes = scopes_from(response.scope.as_deref());
        }
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiry {
            Some(expiry) => now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry,
            None => false,
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty()) && !self.is_expired_at(now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Access token for the `Authorization` header
    pub fn access_token(&self) -> SyncResult<&str> {
        self.token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| auth_error("No access token available"))
    }

    /// Load the token file; `None` when it does not exist yet
    pub fn load(path: &Path) -> SyncResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            auth_error(&format!("Failed to read token from {}: {}", path.display(), e))
        })?;
        let token = serde_json::from_str(&contents).map_err(|e| {
            auth_error(&format!("Failed to parse token from {}: {}", path.display(), e))
        })?;

        Ok(Some(token))
    }

    /// Write the token file, replacing any previous content
    pub fn save(&self, path: &Path) -> SyncResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

/// Expiry `secs` from `now`; `None` when the server sent an out-of-range value
fn expiry_after(now: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(secs).and_then(|d| now.checked_add_signed(d))
}

fn scopes_from(scope: Option<&str>) -> Vec<String> {
    match scope {
        Some(scope) if !scope.trim().is_empty() => {
            scope.split_whitespace().map(str::to_string).collect()
        }
        _ => vec![CALENDAR_READONLY_SCOPE.to_string()],
    }
}

/// Decide the next authentication step for a stored credential
pub fn classify(stored: Option<StoredToken>, now: DateTime<Utc>) -> CredentialState {
    match stored {
        Some(token) if token.is_valid_at(now) => CredentialState::Valid(token),
        Some(token) if token.can_refresh() => CredentialState::Refreshable(token),
        _ => CredentialState::NeedsConsent,
    }
}

/// POST a grant to the token endpoint
pub(super) async fn request_token(
    client: &Client,
    token_uri: &str,
    params: &[(&str, &str)],
) -> SyncResult<TokenResponse> {
    let response = client
        .post(token_uri)
        .form(params)
        .send()
        .await
        .map_err(|e| auth_error(&format!("Failed to reach token endpoint: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(auth_error(&format!(
            "Token request failed: HTTP {} - {}",
            status, error_body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))
}

/// Loads, refreshes or obtains the Google OAuth credential
pub struct TokenManager<'a> {
    config: &'a Config,
    client: Client,
}

impl<'a> TokenManager<'a> {
    pub fn new(config: &'a Config, client: Client) -> Self {
        Self { config, client }
    }

    /// Return a usable credential, persisting it whenever it changed
    pub async fn authenticate(&self) -> SyncResult<StoredToken> {
        let stored = StoredToken::load(&self.config.token_file)?;

        let token = match classify(stored, Utc::now()) {
            CredentialState::Valid(token) => {
                debug!("Using stored Google token");
                return Ok(token);
            }
            CredentialState::Refreshable(token) => {
                info!("Access token expired, refreshing");
                self.refresh(token).await?
            }
            CredentialState::NeedsConsent => {
                info!("No usable Google token, starting authorization");
                let secrets = ClientSecrets::load(&self.config.credentials_file)?;
                run_consent_flow(&self.client, &secrets).await?
            }
        };

        token.save(&self.config.token_file)?;
        info!("Saved Google token to {}", self.config.token_file.display());

        Ok(token)
    }

    /// Exchange the refresh token for a new access token
    pub async fn refresh(&self, token: StoredToken) -> SyncResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        // Older token files may lack the client identity
        let (client_id, client_secret, token_uri) =
            match (token.client_id.clone(), token.client_secret.clone()) {
                (Some(id), Some(secret)) => (
                    id,
                    secret,
                    token
                        .token_uri
                        .clone()
                        .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
                ),
                _ => {
                    let secrets = ClientSecrets::load(&self.config.credentials_file)?;
                    let uri = token.token_uri.clone().unwrap_or(secrets.token_uri);
                    (secrets.client_id, secrets.client_secret, uri)
                }
            };

        let response = request_token(
            &self.client,
            &token_uri,
            &[
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ],
        )
        .await?;

        let mut refreshed = token.refreshed(response, Utc::now());
        refreshed.client_id = Some(client_id);
        refreshed.client_secret = Some(client_secret);
        refreshed.token_uri = Some(token_uri);

        Ok(refreshed)
    }
}
