//! Search-suggestion collector for derived keywords.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde_json::Value;

use trendlens_core::KeywordSuggestions;

use crate::{SourceConfig, SourceError};

const DEFAULT_BASE_URL: &str = "https://suggestqueries.google.com";
const SOURCE_LABEL: &str = "Google Suggest UK";
const SUGGESTIONS_PER_KEYWORD: usize = 5;

/// Client for the public autocomplete endpoint.
pub struct SuggestClient {
    client: reqwest::Client,
    base_url: String,
    pacing_delay: Duration,
    keyword_cap: usize,
}

impl SuggestClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        Self::with_base_url(config, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(config: &SourceConfig, base_url: &str) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            pacing_delay: Duration::from_millis(config.pacing_delay_ms),
            keyword_cap: config.keyword_cap,
        })
    }

    /// Fetch autocomplete suggestions for the first few keywords.
    ///
    /// Keywords are queried one at a time with a pacing delay between
    /// requests to stay under the endpoint's informal rate limits. A failed
    /// keyword is skipped and the remaining keywords are still queried, so
    /// this never fails as a whole.
    pub async fn fetch_suggestions(&self, keywords: &[String]) -> Vec<KeywordSuggestions> {
        let mut collected = Vec::new();

        for keyword in keywords.iter().take(self.keyword_cap) {
            match self.fetch_one(keyword).await {
                Ok(Some(entry)) => collected.push(entry),
                Ok(None) => {
                    tracing::debug!(keyword = %keyword, "suggestion response had no suggestion list");
                }
                Err(e) => {
                    tracing::warn!(keyword = %keyword, error = %e, "suggestion fetch failed");
                }
            }
            tokio::time::sleep(self.pacing_delay).await;
        }

        tracing::debug!(
            keywords = keywords.len(),
            collected = collected.len(),
            "collected keyword suggestions"
        );
        collected
    }

    async fn fetch_one(&self, keyword: &str) -> Result<Option<KeywordSuggestions>, SourceError> {
        let encoded = utf8_percent_encode(keyword, NON_ALPHANUMERIC).to_string();
        let url = format!(
            "{}/complete/search?client=chrome&q={encoded}&gl=GB&hl=en-GB",
            self.base_url
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: format!("suggestions for '{keyword}'"),
            source: e,
        })?;

        // Body shape: ["<query>", ["suggestion", ...], ...extras].
        let Some(list) = data.get(1).and_then(Value::as_array) else {
            return Ok(None);
        };

        let suggestions: Vec<String> = list
            .iter()
            .filter_map(Value::as_str)
            .take(SUGGESTIONS_PER_KEYWORD)
            .map(ToOwned::to_owned)
            .collect();

        Ok(Some(KeywordSuggestions {
            keyword: keyword.to_string(),
            suggestions,
            source: SOURCE_LABEL.to_string(),
        }))
    }
}
