use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Today's word as served by the external word provider. `example` may
/// be absent; it passes through as `null` and the display layer picks
/// a fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordOfTheDay {
    pub word: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
    pub example: Option<String>,
}

#[derive(Clone)]
pub struct WordClient {
    http_client: Client,
    access_url: String,
}

impl WordClient {
    pub fn new(access_url: String, timeout: Duration) -> WordClient {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build a HTTP client");

        WordClient {
            http_client,
            access_url,
        }
    }

    #[tracing::instrument(name = "Fetching the word of the day", skip(self))]
    pub async fn word_of_the_day(&self) -> Result<WordOfTheDay, reqwest::Error> {
        let url = format!("{}/word-of-the-day", self.access_url);

        self.http_client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<WordOfTheDay>()
            .await
    }
}
