use crate::error::{config_error, env_error, SyncResult};
use crate::utils::time::parse_timezone;
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Calendar queried when `GOOGLE_CALENDAR_ID` is not set
pub const DEFAULT_CALENDAR_ID: &str = "primary";
/// Number of upcoming events fetched per run
pub const DEFAULT_MAX_EVENTS: u32 = 15;
/// Reference zone for the "now" lower bound of the event query
pub const DEFAULT_TIMEZONE: &str = "US/Pacific";
pub const DEFAULT_GOOGLE_API_BASE: &str = "https://www.googleapis.com";
pub const DEFAULT_TRELLO_API_BASE: &str = "https://api.trello.com";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";
pub const DEFAULT_PROCESSED_EVENTS_FILE: &str = "processed_events.txt";

/// Google OAuth file locations; all `get_calendar_token` needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFiles {
    /// OAuth client secrets downloaded from the Google console
    pub credentials_file: PathBuf,
    /// Persisted OAuth token
    pub token_file: PathBuf,
}

impl TokenFiles {
    /// Load file locations from `.env` and the process environment
    pub fn load() -> Self {
        dotenv().ok();

        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        TokenFiles {
            credentials_file: optional_var(
                lookup,
                "GOOGLE_CREDENTIALS_FILE",
                DEFAULT_CREDENTIALS_FILE,
            )
            .into(),
            token_file: optional_var(lookup, "GOOGLE_TOKEN_FILE", DEFAULT_TOKEN_FILE).into(),
        }
    }
}

/// Runtime configuration, built once at startup and passed by reference
#[derive(Clone)]
pub struct Config {
    /// Trello API key
    pub trello_api_key: String,
    /// Trello API token
    pub trello_token: String,
    /// Trello list that receives the new cards
    pub trello_list_id: String,
    /// Base URL of the Trello REST API
    pub trello_api_base: String,
    /// Google Calendar ID to read
    pub google_calendar_id: String,
    /// Base URL of the Google REST APIs
    pub google_api_base: String,
    /// OAuth client secrets downloaded from the Google console
    pub credentials_file: PathBuf,
    /// Persisted OAuth token
    pub token_file: PathBuf,
    /// Newline-separated log of event IDs that already have a card
    pub processed_events_file: PathBuf,
    /// Maximum number of upcoming events fetched per run
    pub max_events: u32,
    /// Timezone used for the lower bound of the event query
    pub timezone: Tz,
}

impl Config {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> SyncResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> SyncResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| env_error(key))
        };
        let optional = |key: &str, default: &str| optional_var(&lookup, key, default);

        let trello_api_key = required("TRELLO_API_KEY")?;
        let trello_token = required("TRELLO_TOKEN")?;
        let trello_list_id = required("TRELLO_LIST_ID")?;

        let max_events = match lookup("MAX_EVENTS").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| env_error("Invalid MAX_EVENTS format"))?,
            None => DEFAULT_MAX_EVENTS,
        };

        let timezone_name = optional("TIMEZONE", DEFAULT_TIMEZONE);
        let TokenFiles {
            credentials_file,
            token_file,
        } = TokenFiles::from_lookup(&lookup);

        let timezone = parse_timezone(&timezone_name)
            .ok_or_else(|| config_error(&format!("Unknown timezone: {}", timezone_name)))?;

        Ok(Config {
            trello_api_key,
            trello_token,
            trello_list_id,
            trello_api_base: trim_base(optional("TRELLO_API_BASE", DEFAULT_TRELLO_API_BASE)),
            google_calendar_id: optional("GOOGLE_CALENDAR_ID", DEFAULT_CALENDAR_ID),
            google_api_base: trim_base(optional("GOOGLE_API_BASE", DEFAULT_GOOGLE_API_BASE)),
            credentials_file,
            token_file,
            processed_events_file: optional(
                "PROCESSED_EVENTS_FILE",
                DEFAULT_PROCESSED_EVENTS_FILE,
            )
            .into(),
            max_events,
            timezone,
        })
    }
}

/// Value of an optional variable; unset or blank falls back to `default`
fn optional_var<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}

// Keep the Trello credentials out of logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("trello_api_key", &"<redacted>")
            .field("trello_token", &"<redacted>")
            .field("trello_list_id", &self.trello_list_id)
            .field("trello_api_base", &self.trello_api_base)
            .field("google_calendar_id", &self.google_calendar_id)
            .field("google_api_base", &self.google_api_base)
            .field("credentials_file", &self.credentials_file)
            .field("token_file", &self.token_file)
            .field("processed_events_file", &self.processed_events_file)
            .field("max_events", &self.max_events)
            .field("timezone", &self.timezone)
            .finish()
    }
}
