use calboard::components::google_calendar::consent::run_consent_flow;
use calboard::components::google_calendar::credentials::ClientSecrets;
use calboard::config::TokenFiles;
use calboard::startup;
use tracing::info;

/// Run the Google consent flow and overwrite the token file
#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let files = TokenFiles::load();
    let secrets = ClientSecrets::load(&files.credentials_file)?;
    let client = startup::http_client()?;

    let token = run_consent_flow(&client, &secrets).await?;
    token.save(&files.token_file)?;

    info!("Token saved to {}", files.token_file.display());

    Ok(())
}
