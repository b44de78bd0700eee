//! Trending-topics collector for the national trends listing.

use std::time::Duration;

use serde_json::Value;

use trendlens_core::TrendingTopic;

use crate::{SourceConfig, SourceError};

const DEFAULT_BASE_URL: &str = "https://getdaytrends.com";
const SOURCE_LABEL: &str = "X Trends UK";
const TOPIC_CAP: usize = 10;

/// Client for the scraped trends-listing endpoint. Not keyword-scoped: the
/// listing is national, so one fetch serves every wizard run.
pub struct TopicsClient {
    client: reqwest::Client,
    base_url: String,
}

impl TopicsClient {
    /// Creates a client pointed at the production listing.
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
        })
    }

    /// Fetch the current UK trending topics, capped at ten entries.
    ///
    /// # Errors
    ///
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_trending(&self) -> Result<Vec<TrendingTopic>, SourceError> {
        let url = format!("{}/api/trends/united-kingdom", self.base_url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(SourceError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: "trending topics".to_string(),
            source: e,
        })?;

        let topics: Vec<TrendingTopic> = data
            .get("trends")
            .and_then(Value::as_array)
            .map(|trends| {
                trends
                    .iter()
                    .take(TOPIC_CAP)
                    .filter_map(topic_from_entry)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(count = topics.len(), "collected trending topics");
        Ok(topics)
    }
}

/// Listing entries are loosely shaped: an object with `name` or `query`, or
/// occasionally a bare string.
fn topic_from_entry(entry: &Value) -> Option<TrendingTopic> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| entry.get("query").and_then(Value::as_str))
        .or_else(|| entry.as_str())?;

    let volume = ["volume", "tweet_volume"]
        .iter()
        .filter_map(|k| entry.get(*k))
        .find(|v| !v.is_null())
        .map_or_else(|| "N/A".to_string(), display_volume);

    Some(TrendingTopic {
        name: name.to_string(),
        volume,
        source: SOURCE_LABEL.to_string(),
    })
}

fn display_volume(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => "N/A".to_string(),
    }
}

/// Fallback shown when the trends listing is unreachable.
#[must_use]
pub fn fallback_topics() -> Vec<TrendingTopic> {
    let entries = [
        ("UK Cost of Living", "High"),
        ("Local Business", "Medium"),
        ("Winter Weather UK", "Medium"),
    ];
    entries
        .iter()
        .map(|(name, volume)| TrendingTopic {
            name: (*name).to_string(),
            volume: (*volume).to_string(),
            source: SOURCE_LABEL.to_string(),
        })
        .collect()
}
