//! Forum hot-listing collector across UK communities.

use std::time::Duration;

use serde::Deserialize;

use trendlens_core::ForumDiscussion;

use crate::{SourceConfig, SourceError};

const DEFAULT_BASE_URL: &str = "https://www.reddit.com";
const SOURCE_LABEL: &str = "Reddit UK Communities";
const UK_COMMUNITIES: [&str; 5] = [
    "unitedkingdom",
    "AskUK",
    "britishproblems",
    "ukbusiness",
    "london",
];
const COMMUNITY_CAP: usize = 3;
const POSTS_PER_COMMUNITY: usize = 2;
const LISTING_LIMIT: usize = 5;

/// Hot-listing wrapper as served by the forum's public JSON endpoint.
#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Post>,
}

#[derive(Debug, Deserialize)]
struct Post {
    data: PostData,
}

#[derive(Debug, Deserialize)]
struct PostData {
    title: Option<String>,
    selftext: Option<String>,
    score: Option<i64>,
    num_comments: Option<i64>,
    subreddit: Option<String>,
    permalink: Option<String>,
}

/// Client for the read-only forum hot listings. No auth required.
pub struct DiscussionsClient {
    client: reqwest::Client,
    base_url: String,
    pacing_delay: Duration,
}

impl DiscussionsClient {
    /// Creates a client pointed at the production forum.
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
        })
    }

    /// Pull hot posts from the first few communities and keep the ones that
    /// mention any of the supplied keywords, two per community at most.
    ///
    /// Communities are queried sequentially with a pacing delay; a failed
    /// community is skipped, so this never fails as a whole.
    pub async fn fetch_discussions(&self, keywords: &[String]) -> Vec<ForumDiscussion> {
        let lowered: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let mut discussions = Vec::new();

        for community in UK_COMMUNITIES.iter().take(COMMUNITY_CAP).copied() {
            match self.fetch_community(community).await {
                Ok(listing) => {
                    let matched = listing
                        .data
                        .children
                        .iter()
                        .filter(|post| mentions_any(&post.data, &lowered))
                        .take(POSTS_PER_COMMUNITY)
                        .filter_map(|post| to_discussion(&post.data));
                    discussions.extend(matched);
                }
                Err(e) => {
                    tracing::warn!(community, error = %e, "discussion fetch failed");
                }
            }
            tokio::time::sleep(self.pacing_delay).await;
        }

        tracing::debug!(count = discussions.len(), "collected forum discussions");
        discussions
    }

    async fn fetch_community(&self, community: &str) -> Result<Listing, SourceError> {
        let url = format!(
            "{}/r/{community}/hot.json?limit={LISTING_LIMIT}",
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
        serde_json::from_str(&body).map_err(|e| SourceError::Deserialize {
            context: format!("hot listing for '{community}'"),
            source: e,
        })
    }
}

fn mentions_any(post: &PostData, lowered_keywords: &[String]) -> bool {
    let text = format!(
        "{} {}",
        post.title.as_deref().unwrap_or_default(),
        post.selftext.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    lowered_keywords.iter().any(|k| text.contains(k.as_str()))
}

fn to_discussion(post: &PostData) -> Option<ForumDiscussion> {
    let title = post.title.clone()?;
    Some(ForumDiscussion {
        title,
        score: post.score.unwrap_or(0),
        comments: post.num_comments.unwrap_or(0),
        subreddit: post.subreddit.clone().unwrap_or_default(),
        url: format!(
            "https://reddit.com{}",
            post.permalink.as_deref().unwrap_or_default()
        ),
        source: SOURCE_LABEL.to_string(),
    })
}
