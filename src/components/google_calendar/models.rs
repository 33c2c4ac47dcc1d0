use serde::Deserialize;

/// Start of a calendar event, kept verbatim as the API returned it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStart {
    /// Zoned date-time, e.g. `2023-09-05T09:00:00-07:00`
    DateTime(String),
    /// All-day event date, e.g. `2023-09-05`
    Date(String),
}

impl EventStart {
    pub fn as_str(&self) -> &str {
        match self {
            EventStart::DateTime(s) | EventStart::Date(s) => s,
        }
    }
}

/// Simplified calendar event representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: EventStart,
}

impl CalendarEvent {
    /// Name of the Trello card created for this event: title followed
    /// directly by the start string
    pub fn card_name(&self) -> String {
        format!("{}{}", self.title, self.start.as_str())
    }
}

/// Response body of `events.list`
#[derive(Debug, Deserialize)]
pub struct EventListResponse {
    #[serde(default)]
    pub items: Vec<ApiEvent>,
}

/// One item of `events.list`; only the fields we use
#[derive(Debug, Deserialize)]
pub struct ApiEvent {
    pub id: String,
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<ApiEventTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEventTime {
    pub date_time: Option<String>,
    pub date: Option<String>,
}

impl ApiEvent {
    /// Convert to a [`CalendarEvent`]; `None` when the item has no start
    pub fn into_event(self) -> Option<CalendarEvent> {
        let start = self.start?;
        let start = match (start.date_time, start.date) {
            (Some(dt), _) => EventStart::DateTime(dt),
            (None, Some(d)) => EventStart::Date(d),
            (None, None) => return None,
        };

        Some(CalendarEvent {
            id: self.id,
            title: self.summary.unwrap_or_default(),
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_list() {
        let body = r#"{
            "kind": "calendar#events",
            "items": [
                {
                    "id": "abc123",
                    "summary": "Standup",
                    "start": {"dateTime": "2023-09-05T09:00:00-07:00", "timeZone": "America/Los_Angeles"},
                    "end": {"dateTime": "2023-09-05T09:15:00-07:00"}
                },
                {
                    "id": "holiday1",
                    "summary": "Labor Day",
                    "start": {"date": "2023-09-04"}
                },
                {
                    "id": "untitled",
                    "start": {"dateTime": "2023-09-06T12:00:00-07:00"}
                }
            ]
        }"#;

        let response: EventListResponse = serde_json::from_str(body).unwrap();
        let events: Vec<CalendarEvent> = response
            .items
            .into_iter()
            .filter_map(ApiEvent::into_event)
            .collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id, "abc123");
        assert_eq!(
            events[0].start,
            EventStart::DateTime("2023-09-05T09:00:00-07:00".to_string())
        );
        assert_eq!(events[1].start, EventStart::Date("2023-09-04".to_string()));
        assert_eq!(events[2].title, "");
    }

    #[test]
    fn test_missing_items_is_empty() {
        let response: EventListResponse =
            serde_json::from_str(r#"{"kind": "calendar#events"}"#).unwrap();
        assert!(response.items.is_empty());
    }

    #[test]
    fn test_event_without_start_is_dropped() {
        let event: ApiEvent = serde_json::from_str(r#"{"id": "x", "summary": "No start"}"#).unwrap();
        assert!(event.into_event().is_none());

        let event: ApiEvent =
            serde_json::from_str(r#"{"id": "y", "summary": "Empty start", "start": {}}"#).unwrap();
        assert!(event.into_event().is_none());
    }

    #[test]
    fn test_card_name_concatenates_title_and_start() {
        let event = CalendarEvent {
            id: "abc123".to_string(),
            title: "Standup".to_string(),
            start: EventStart::DateTime("2023-09-05T09:00:00-07:00".to_string()),
        };
        assert_eq!(event.card_name(), "Standup2023-09-05T09:00:00-07:00");

        let all_day = CalendarEvent {
            id: "d".to_string(),
            title: "Offsite".to_string(),
            start: EventStart::Date("2023-09-08".to_string()),
        };
        assert_eq!(all_day.card_name(), "Offsite2023-09-08");
    }
}
