use crate::components::{CardPublisher, EventSource, ProcessedEvents};
use crate::error::SyncResult;
use std::path::Path;
use tracing::{debug, error, info};

/// Counters for one sync run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Events returned by the calendar
    pub fetched: usize,
    /// Events that already had a card
    pub skipped: usize,
    /// Cards created
    pub published: usize,
    /// Card creations the board rejected or that failed in transit
    pub failed: usize,
}

/// Create a card for every upcoming event not yet in the processed log.
///
/// A calendar failure aborts the run before anything is written. A board
/// failure is logged and the event is still recorded, so it is never retried.
pub async fn sync_events<S, P>(
    source: &S,
    publisher: &P,
    processed_path: &Path,
) -> SyncResult<SyncReport>
where
    S: EventSource + ?Sized,
    P: CardPublisher + ?Sized,
{
    let events = source.upcoming_events().await?;
    let mut report = SyncReport {
        fetched: events.len(),
        ..Default::default()
    };

    if events.is_empty() {
        info!("No upcoming events found.");
        return Ok(report);
    }

    let mut processed = ProcessedEvents::load(processed_path)?;
    debug!(
        "Loaded {} processed event IDs from {}",
        processed.len(),
        processed.path().display()
    );

    for event in &events {
        if processed.contains(&event.id) {
            debug!("Skipping already processed event {}", event.id);
            report.skipped += 1;
            continue;
        }

        info!("{} {}", event.start.as_str(), event.title);

        match publisher.create_card(&event.card_name()).await {
            Ok(()) => report.published += 1,
            Err(e) => {
                error!("Error adding card to Trello: {}", e);
                report.failed += 1;
            }
        }

        // Recorded even when the card failed: at most one attempt per event
        processed.record(&event.id)?;
    }

    Ok(report)
}
