use calboard::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting calboard");

    // Load configuration
    let config = startup::load_config()?;

    let report = startup::run(&config).await?;
    info!(
        "Done: {} fetched, {} already processed, {} cards created, {} failed",
        report.fetched, report.skipped, report.published, report.failed
    );

    Ok(())
}
