use crate::components::{GoogleCalendarReader, TrelloClient};
use crate::components::google_calendar::TokenManager;
use crate::config::Config;
use crate::error::{other_error, Error, SyncResult};
use crate::sync::{sync_events, SyncReport};
use reqwest::Client;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Shared HTTP client for the Google and Trello calls
pub fn http_client() -> SyncResult<Client> {
    Client::builder()
        .user_agent(concat!("calboard/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| other_error(&format!("Failed to build HTTP client: {}", e)))
}

/// Authenticate, then copy new calendar events to the board
pub async fn run(config: &Config) -> SyncResult<SyncReport> {
    let client = http_client()?;

    let token = TokenManager::new(config, client.clone()).authenticate().await?;
    let reader = GoogleCalendarReader::new(config, client.clone(), token.access_token()?);
    let publisher = TrelloClient::new(config, client);

    sync_events(&reader, &publisher, &config.processed_events_file)
        .await
        .inspect_err(|e| error!("An error occurred: {}", e))
}
