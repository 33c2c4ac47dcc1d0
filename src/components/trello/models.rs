use serde::{Deserialize, Serialize};

/// Query parameters of `POST /1/cards`
#[derive(Debug, Serialize)]
pub struct NewCardQuery<'a> {
    pub key: &'a str,
    pub token: &'a str,
    #[serde(rename = "idList")]
    pub id_list: &'a str,
    pub name: &'a str,
}

/// The part of the created card we log
#[derive(Debug, Deserialize)]
pub struct CreatedCard {
    pub id: String,
    #[serde(rename = "shortUrl")]
    pub short_url: Option<String>,
}
