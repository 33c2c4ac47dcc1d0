use calboard::config::Config;
use calboard::error::{env_error, google_calendar_error, trello_error, Error};
use calboard::sync::SyncReport;
use miette::Diagnostic;

/// Smoke test to verify that the config can be built
#[test]
fn test_config_loads() {
    let config = Config::from_lookup(|key| match key {
        "TRELLO_API_KEY" => Some("key".to_string()),
        "TRELLO_TOKEN" => Some("token".to_string()),
        "TRELLO_LIST_ID" => Some("list".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.trello_list_id, "list");
    assert_eq!(config.google_calendar_id, "primary");
}

fn code(e: &Error) -> Option<String> {
    e.code().map(|c| c.to_string())
}

/// Errors carry a diagnostic code per kind
#[test]
fn test_error_codes() {
    assert_eq!(
        code(&google_calendar_error("boom")).as_deref(),
        Some("calboard::google_calendar")
    );
    assert_eq!(code(&trello_error("boom")).as_deref(), Some("calboard::trello"));
    assert_eq!(code(&env_error("X")).as_deref(), Some("calboard::environment"));
}

#[test]
fn test_error_messages() {
    assert_eq!(
        env_error("TRELLO_TOKEN").to_string(),
        "Environment error: Missing environment variable: TRELLO_TOKEN"
    );
    assert_eq!(
        trello_error("HTTP 401").to_string(),
        "Trello API error: HTTP 401"
    );
}

#[test]
fn test_empty_report() {
    let report = SyncReport::default();
    assert_eq!(report.fetched + report.skipped + report.published + report.failed, 0);
}
