use crate::error::SyncResult;
use async_trait::async_trait;

pub mod google_calendar;
pub mod processed_events;
pub mod trello;

pub use google_calendar::{CalendarEvent, GoogleCalendarReader};
pub use processed_events::ProcessedEvents;
pub use trello::TrelloClient;

/// Source of upcoming calendar events
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Upcoming events, ordered by start time
    async fn upcoming_events(&self) -> SyncResult<Vec<CalendarEvent>>;
}

/// Destination that turns events into cards
#[async_trait]
pub trait CardPublisher: Send + Sync {
    /// Create one card with the given name
    async fn create_card(&self, name: &str) -> SyncResult<()>;
}
