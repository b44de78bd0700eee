//! Settle-all aggregation across the four trend sources.

use std::time::{Duration, Instant};

use thiserror::Error;

use trendlens_core::{
    AppConfig, BusinessProfile, ForumDiscussion, IdeaError, IdeaGenerator, KeywordSuggestions,
    NewsArticle, TrendBundle, TrendReport, TrendingTopic,
};

use crate::cache::{keyword_cache_key, TrendCache};
use crate::{news, topics, DiscussionsClient, NewsClient, SuggestClient, TopicsClient};

const TOPICS_CACHE_KEY: &str = "topics:united-kingdom";
const NEWS_CACHE_KEY: &str = "news:business";

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("idea generation failed: {0}")]
    IdeaGeneration(#[from] IdeaError),
}

/// Per-source cache lifetimes.
#[derive(Debug, Clone, Copy)]
pub struct SourceTtls {
    pub suggestions: Duration,
    pub topics: Duration,
    pub discussions: Duration,
    pub articles: Duration,
}

impl Default for SourceTtls {
    fn default() -> Self {
        Self {
            suggestions: Duration::from_secs(120 * 60),
            topics: Duration::from_secs(120 * 60),
            discussions: Duration::from_secs(120 * 60),
            articles: Duration::from_secs(240 * 60),
        }
    }
}

impl SourceTtls {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            suggestions: Duration::from_secs(config.suggestions_ttl_minutes * 60),
            topics: Duration::from_secs(config.topics_ttl_minutes * 60),
            discussions: Duration::from_secs(config.discussions_ttl_minutes * 60),
            articles: Duration::from_secs(config.news_ttl_minutes * 60),
        }
    }
}

/// Owns the four source clients and the cache in front of them.
pub struct TrendAggregator {
    suggest: SuggestClient,
    topics: TopicsClient,
    discussions: DiscussionsClient,
    news: NewsClient,
    cache: TrendCache,
    ttls: SourceTtls,
}

impl TrendAggregator {
    #[must_use]
    pub fn new(
        suggest: SuggestClient,
        topics: TopicsClient,
        discussions: DiscussionsClient,
        news: NewsClient,
        cache: TrendCache,
        ttls: SourceTtls,
    ) -> Self {
        Self {
            suggest,
            topics,
            discussions,
            news,
            cache,
            ttls,
        }
    }

    /// Run one full aggregation for a profile and its keyword list.
    ///
    /// The four source tasks run concurrently and are joined without
    /// short-circuiting: a failed source contributes its empty or fallback
    /// list and the remaining sources are unaffected. Idea generation is the
    /// only step that can fail the operation, since trend data without ideas
    /// is not a useful partial result.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::IdeaGeneration`] if the generator fails.
    pub async fn analyze<G>(
        &self,
        generator: &G,
        profile: &BusinessProfile,
        keywords: &[String],
    ) -> Result<TrendReport, AggregateError>
    where
        G: IdeaGenerator + Sync,
    {
        let started = Instant::now();

        let (suggestions, topics, discussions, articles) = tokio::join!(
            self.collect_suggestions(keywords),
            self.collect_topics(),
            self.collect_discussions(keywords),
            self.collect_articles(),
        );

        let bundle = TrendBundle {
            suggestions,
            topics,
            discussions,
            articles,
        };

        let post_ideas = generator.propose_ideas(profile, &bundle).await?;

        let processing_time = started.elapsed().as_secs_f64();
        tracing::info!(
            business = %profile.business_name,
            ideas = post_ideas.len(),
            processing_time,
            "trend aggregation complete"
        );

        Ok(TrendReport {
            bundle,
            post_ideas,
            processing_time,
            cached: false,
        })
    }

    async fn collect_suggestions(&self, keywords: &[String]) -> Vec<KeywordSuggestions> {
        let key = keyword_cache_key("suggest", keywords);
        if let Some(hit) = self.cache.suggestions.get(&key).await {
            tracing::debug!(key = %key, "suggestions served from cache");
            return hit;
        }

        let fetched = self.suggest.fetch_suggestions(keywords).await;
        self.cache
            .suggestions
            .set(&key, fetched.clone(), self.ttls.suggestions)
            .await;
        fetched
    }

    async fn collect_topics(&self) -> Vec<TrendingTopic> {
        if let Some(hit) = self.cache.topics.get(TOPICS_CACHE_KEY).await {
            tracing::debug!("trending topics served from cache");
            return hit;
        }

        match self.topics.fetch_trending().await {
            Ok(fetched) => {
                self.cache
                    .topics
                    .set(TOPICS_CACHE_KEY, fetched.clone(), self.ttls.topics)
                    .await;
                fetched
            }
            Err(e) => {
                // The fallback list is not cached so the next run retries.
                tracing::warn!(error = %e, "trending topics fetch failed; using fallback list");
                topics::fallback_topics()
            }
        }
    }

    async fn collect_discussions(&self, keywords: &[String]) -> Vec<ForumDiscussion> {
        let key = keyword_cache_key("forum", keywords);
        if let Some(hit) = self.cache.discussions.get(&key).await {
            tracing::debug!(key = %key, "discussions served from cache");
            return hit;
        }

        let fetched = self.discussions.fetch_discussions(keywords).await;
        self.cache
            .discussions
            .set(&key, fetched.clone(), self.ttls.discussions)
            .await;
        fetched
    }

    async fn collect_articles(&self) -> Vec<NewsArticle> {
        if !self.news.has_api_key() {
            tracing::warn!("news API key not configured; using fallback article");
            return news::fallback_articles();
        }

        if let Some(hit) = self.cache.articles.get(NEWS_CACHE_KEY).await {
            tracing::debug!("news articles served from cache");
            return hit;
        }

        match self.news.fetch_business_news().await {
            Ok(fetched) => {
                self.cache
                    .articles
                    .set(NEWS_CACHE_KEY, fetched.clone(), self.ttls.articles)
                    .await;
                fetched
            }
            Err(e) => {
                tracing::warn!(error = %e, "news fetch failed");
                Vec::new()
            }
        }
    }
}
