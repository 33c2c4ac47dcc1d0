use crate::error::{auth_error, SyncResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client identity from the Google console download
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// The console wraps the secrets in an `installed` or `web` section
#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Load client secrets from `credentials.json`
    pub fn load(path: &Path) -> SyncResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            auth_error(&format!(
                "Failed to read client secrets from {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&contents).map_err(|e| {
            auth_error(&format!(
                "Invalid client secrets in {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn parse(contents: &str) -> Result<Self, String> {
        let file: ClientSecretsFile = serde_json::from_str(contents).map_err(|e| e.to_string())?;

        file.installed
            .or(file.web)
            .ok_or_else(|| "expected an \"installed\" or \"web\" section".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_parse_installed_client() {
        let secrets = ClientSecrets::parse(
            r#"{"installed": {
                "client_id": "id.apps.googleusercontent.com",
                "project_id": "calboard",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "shh",
                "redirect_uris": ["http://localhost"]
            }}"#,
        )
        .unwrap();

        assert_eq!(secrets.client_id, "id.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret, "shh");
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_parse_web_client_with_defaults() {
        let secrets =
            ClientSecrets::parse(r#"{"web": {"client_id": "id", "client_secret": "s"}}"#).unwrap();

        assert_eq!(secrets.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_parse_without_section_fails() {
        assert!(ClientSecrets::parse(r#"{"client_id": "id", "client_secret": "s"}"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientSecrets::load(&dir.path().join("credentials.json"));

        match result {
            Err(Error::Auth(message)) => assert!(message.contains("credentials.json")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
