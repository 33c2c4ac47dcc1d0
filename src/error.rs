use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(calboard::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(calboard::config))]
    Config(String),

    #[error("Authorization error: {0}")]
    #[diagnostic(
        code(calboard::auth),
        help("Delete the token file or run `get_calendar_token` to authorize again")
    )]
    Auth(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(calboard::google_calendar))]
    GoogleCalendar(String),

    #[error("Trello API error: {0}")]
    #[diagnostic(code(calboard::trello))]
    Trello(String),

    #[error(transparent)]
    #[diagnostic(code(calboard::io))]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(calboard::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(calboard::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type SyncResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create authorization errors
pub fn auth_error(message: &str) -> Error {
    Error::Auth(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create Trello errors
pub fn trello_error(message: &str) -> Error {
    Error::Trello(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
