//! Business-news collector backed by a hosted news API.

use std::time::Duration;

use serde::Deserialize;

use trendlens_core::NewsArticle;

use crate::{SourceConfig, SourceError};

const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const SOURCE_LABEL: &str = "BBC Business News";
const ARTICLE_CAP: usize = 5;

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    articles: Vec<ArticleEntry>,
}

#[derive(Debug, Deserialize)]
struct ArticleEntry {
    title: Option<String>,
    description: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    url: Option<String>,
}

/// Client for the news API. The API key comes from configuration; without
/// one, callers substitute [`fallback_articles`] instead of making requests.
pub struct NewsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsClient {
    /// Creates a client pointed at the production news API.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(config: &SourceConfig, api_key: Option<String>) -> Result<Self, SourceError> {
        Self::with_base_url(config, api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn with_base_url(
        config: &SourceConfig,
        api_key: Option<String>,
        base_url: &str,
    ) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch the latest business headlines, capped at five articles.
    ///
    /// # Errors
    ///
    /// - [`SourceError::MissingApiKey`] when no key is configured.
    /// - [`SourceError::Http`] on network failure.
    /// - [`SourceError::UnexpectedStatus`] on a non-2xx response.
    /// - [`SourceError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn fetch_business_news(&self) -> Result<Vec<NewsArticle>, SourceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(SourceError::MissingApiKey);
        };

        let url = format!("{}/v2/everything", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("sources", "bbc-news"),
                ("category", "business"),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", "5"),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::UnexpectedStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let data: NewsResponse =
            serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
                context: "business news".to_string(),
                source: e,
            })?;

        let articles: Vec<NewsArticle> = data
            .articles
            .into_iter()
            .take(ARTICLE_CAP)
            .map(to_article)
            .collect();

        tracing::debug!(count = articles.len(), "collected news articles");
        Ok(articles)
    }
}

fn to_article(entry: ArticleEntry) -> NewsArticle {
    NewsArticle {
        title: entry.title.unwrap_or_default(),
        description: entry.description.unwrap_or_default(),
        published_at: entry.published_at.unwrap_or_default(),
        url: entry.url.unwrap_or_default(),
        source: SOURCE_LABEL.to_string(),
    }
}

/// Single fallback article used when no API key is configured.
#[must_use]
pub fn fallback_articles() -> Vec<NewsArticle> {
    vec![NewsArticle {
        title: "UK Business Confidence Rises Despite Economic Challenges".to_string(),
        description: "Latest surveys show small business optimism increasing across key sectors"
            .to_string(),
        published_at: chrono::Utc::now().to_rfc3339(),
        url: "https://bbc.co.uk/news/business".to_string(),
        source: SOURCE_LABEL.to_string(),
    }]
}
