pub mod consent;
pub mod credentials;
pub mod models;
mod reader;
pub mod token;

pub use models::{CalendarEvent, EventStart};
pub use reader::GoogleCalendarReader;
pub use token::{StoredToken, TokenManager};
