use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub news_api_key: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub source_request_timeout_secs: u64,
    pub source_user_agent: String,
    pub source_pacing_delay_ms: u64,
    pub source_keyword_cap: usize,
    pub suggestions_ttl_minutes: u64,
    pub topics_ttl_minutes: u64,
    pub discussions_ttl_minutes: u64,
    pub news_ttl_minutes: u64,
    pub analysis_freshness_minutes: i32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "news_api_key",
                &self.news_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "source_request_timeout_secs",
                &self.source_request_timeout_secs,
            )
            .field("source_user_agent", &self.source_user_agent)
            .field("source_pacing_delay_ms", &self.source_pacing_delay_ms)
            .field("source_keyword_cap", &self.source_keyword_cap)
            .field("suggestions_ttl_minutes", &self.suggestions_ttl_minutes)
            .field("topics_ttl_minutes", &self.topics_ttl_minutes)
            .field("discussions_ttl_minutes", &self.discussions_ttl_minutes)
            .field("news_ttl_minutes", &self.news_ttl_minutes)
            .field(
                "analysis_freshness_minutes",
                &self.analysis_freshness_minutes,
            )
            .finish()
    }
}
