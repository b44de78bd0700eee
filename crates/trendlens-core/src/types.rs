//! Shared domain types for the trend-analysis wizard.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::IdeaError;

/// Profile a business owner submits at the start of a wizard run.
///
/// All six fields are required and non-empty by the time a profile reaches
/// the core; request validation happens at the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_name: String,
    pub business_type: String,
    pub city: String,
    pub industry: String,
    pub target_audience: String,
    pub services_offered: String,
}

/// Autocomplete suggestions collected for one derived keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSuggestions {
    pub keyword: String,
    pub suggestions: Vec<String>,
    pub source: String,
}

/// A trending topic from the trends-listing site.
///
/// `volume` is a display string: upstream reports it as a tweet count, a
/// coarse label, or not at all, in which case it is `"N/A"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingTopic {
    pub name: String,
    pub volume: String,
    pub source: String,
}

/// A forum discussion that mentioned at least one of the derived keywords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumDiscussion {
    pub title: String,
    pub score: i64,
    pub comments: i64,
    pub subreddit: String,
    pub url: String,
    pub source: String,
}

/// A business-news article headline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub url: String,
    pub source: String,
}

/// The four per-source result lists gathered by one aggregation run.
///
/// Any list may be empty; a failed source contributes its empty or fallback
/// list rather than failing the bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendBundle {
    pub suggestions: Vec<KeywordSuggestions>,
    pub topics: Vec<TrendingTopic>,
    pub discussions: Vec<ForumDiscussion>,
    pub articles: Vec<NewsArticle>,
}

/// A content concept proposed for the business.
///
/// `relevance_score` is generator-assigned in `[0.0, 1.0]` and is not
/// recomputed downstream. Idea ids are only meaningful within the report
/// that produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentIdea {
    pub id: String,
    pub concept: String,
    pub trend_source: String,
    pub relevance_score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Immutable result of one trend-analysis run.
///
/// `cached` is `false` on the aggregation path; the `true` value only
/// appears when a stored report is replayed from the freshness lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    #[serde(flatten)]
    pub bundle: TrendBundle,
    pub post_ideas: Vec<ContentIdea>,
    pub processing_time: f64,
    pub cached: bool,
}

/// Pluggable idea-generation collaborator.
///
/// Implementations turn a profile plus the gathered trend bundle into a
/// ranked list of content concepts. The list may be empty; an `Err` fails
/// the whole aggregation at the caller.
pub trait IdeaGenerator {
    fn propose_ideas(
        &self,
        profile: &BusinessProfile,
        bundle: &TrendBundle,
    ) -> impl Future<Output = Result<Vec<ContentIdea>, IdeaError>> + Send;
}
