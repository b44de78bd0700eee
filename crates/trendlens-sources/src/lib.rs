//! Trend-source adapters, the keyed TTL cache, and the aggregator.

use trendlens_core::AppConfig;

pub mod aggregate;
pub mod cache;
mod discussions;
mod error;
mod news;
mod suggest;
mod topics;

pub use aggregate::{AggregateError, SourceTtls, TrendAggregator};
pub use cache::{keyword_cache_key, TrendCache, TtlCache};
pub use discussions::DiscussionsClient;
pub use error::SourceError;
pub use news::NewsClient;
pub use suggest::SuggestClient;
pub use topics::TopicsClient;

/// Shared knobs for the source HTTP clients.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub pacing_delay_ms: u64,
    pub keyword_cap: usize,
}

impl SourceConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            request_timeout_secs: config.source_request_timeout_secs,
            user_agent: config.source_user_agent.clone(),
            pacing_delay_ms: config.source_pacing_delay_ms,
            keyword_cap: config.source_keyword_cap,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            user_agent: "trendlens/0.1 (trend-analysis)".to_string(),
            pacing_delay_ms: 1_000,
            keyword_cap: 3,
        }
    }
}
