use thiserror::Error;

mod app_config;
mod config;
mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    BusinessProfile, ContentIdea, ForumDiscussion, IdeaGenerator, KeywordSuggestions, NewsArticle,
    TrendBundle, TrendReport, TrendingTopic,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Error surfaced by an [`IdeaGenerator`] implementation.
///
/// The built-in template generator never fails; model-backed generators
/// report upstream failures through [`IdeaError::Generation`].
#[derive(Debug, Error)]
pub enum IdeaError {
    #[error("idea generation failed: {0}")]
    Generation(String),
}
