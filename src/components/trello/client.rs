use super::models::{CreatedCard, NewCardQuery};
use crate::components::CardPublisher;
use crate::config::Config;
use crate::error::{trello_error, SyncResult};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

/// Creates cards on the configured Trello list
pub struct TrelloClient<'a> {
    config: &'a Config,
    client: Client,
}

impl<'a> TrelloClient<'a> {
    pub fn new(config: &'a Config, client: Client) -> Self {
        Self { config, client }
    }

    fn cards_url(&self) -> String {
        format!("{}/1/cards", self.config.trello_api_base)
    }
}

#[async_trait]
impl CardPublisher for TrelloClient<'_> {
    async fn create_card(&self, name: &str) -> SyncResult<()> {
        let query = NewCardQuery {
            key: &self.config.trello_api_key,
            token: &self.config.trello_token,
            id_list: &self.config.trello_list_id,
            name,
        };

        let response = self
            .client
            .post(self.cards_url())
            .header(ACCEPT, "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|e| trello_error(&format!("Failed to create card: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(trello_error(&format!(
                "Failed to create card: HTTP {} - {}",
                status, error_body
            )));
        }

        // The card is created at this point; the body is only for the log
        match response.json::<CreatedCard>().await {
            Ok(card) => debug!(
                "Created card {} {}",
                card.id,
                card.short_url.as_deref().unwrap_or("")
            ),
            Err(e) => debug!("Card created but response was not understood: {}", e),
        }

        Ok(())
    }
}
