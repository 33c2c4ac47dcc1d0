use super::credentials::ClientSecrets;
use super::token::{request_token, StoredToken, CALENDAR_READONLY_SCOPE};
use crate::error::{auth_error, SyncResult};
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

const SUCCESS_PAGE: &str = "Authorization successful! You can close this window.";
const FAILURE_PAGE: &str = "Authorization failed. Check the terminal for details.";

/// Build the Google consent page URL
pub fn authorization_url(secrets: &ClientSecrets, redirect_uri: &str, state: &str) -> SyncResult<Url> {
    Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", CALENDAR_READONLY_SCOPE),
            ("state", state),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| auth_error(&format!("Invalid auth_uri {}: {}", secrets.auth_uri, e)))
}

/// Outcome of a request hitting the loopback listener
#[derive(Debug, PartialEq)]
pub enum Callback {
    /// Authorization code for the expected state
    Code(String),
    /// Not the OAuth redirect (favicon and the like)
    Unrelated,
}

/// Extract the authorization code from the redirect request target
pub fn parse_callback(request_target: &str, expected_state: &str) -> SyncResult<Callback> {
    let url = Url::parse("http://localhost")
        .and_then(|base| base.join(request_target))
        .map_err(|e| auth_error(&format!("Malformed callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(auth_error(&format!("Authorization was denied: {}", value)));
            }
            _ => {}
        }
    }

    let Some(code) = code else {
        return Ok(Callback::Unrelated);
    };

    if state.as_deref() != Some(expected_state) {
        return Err(auth_error("OAuth state mismatch in callback"));
    }

    Ok(Callback::Code(code))
}

/// Run the installed-app consent flow: open the consent page, wait for the
/// redirect on a loopback port and exchange the code for tokens
pub async fn run_consent_flow(client: &Client, secrets: &ClientSecrets) -> SyncResult<StoredToken> {
    let server = tiny_http::Server::http("127.0.0.1:0")
        .map_err(|e| auth_error(&format!("Failed to start callback listener: {}", e)))?;
    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .ok_or_else(|| auth_error("Callback listener has no TCP address"))?;
    let redirect_uri = format!("http://localhost:{}/", port);

    // Random state guards against forged callbacks
    let state = uuid::Uuid::new_v4().to_string();
    let auth_url = authorization_url(secrets, &redirect_uri, &state)?;

    info!("Please visit this URL to authorize calboard: {}", auth_url);
    if let Err(e) = webbrowser::open(auth_url.as_str()) {
        warn!("Could not open a browser, open the URL manually: {}", e);
    }
    info!("Waiting for authorization callback on port {}...", port);

    let code = tokio::task::spawn_blocking(move || wait_for_code(&server, &state))
        .await
        .map_err(|e| auth_error(&format!("Callback listener failed: {}", e)))??;

    let response = request_token(
        client,
        &secrets.token_uri,
        &[
            ("client_id", secrets.client_id.as_str()),
            ("client_secret", secrets.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ],
    )
    .await?;

    info!("Authorization completed");
    Ok(StoredToken::from_response(response, secrets, Utc::now()))
}

fn wait_for_code(server: &tiny_http::Server, state: &str) -> SyncResult<String> {
    loop {
        let request = server.recv()?;
        let outcome = parse_callback(request.url(), state);

        let reply = match &outcome {
            Ok(Callback::Code(_)) => tiny_http::Response::from_string(SUCCESS_PAGE),
            Ok(Callback::Unrelated) => {
                debug!("Ignoring request to {}", request.url());
                tiny_http::Response::from_string("Not found").with_status_code(404)
            }
            Err(_) => tiny_http::Response::from_string(FAILURE_PAGE).with_status_code(400),
        };
        request.respond(reply)?;

        match outcome? {
            Callback::Code(code) => return Ok(code),
            Callback::Unrelated => continue,
        }
    }
}
