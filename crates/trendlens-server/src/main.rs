mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use trendlens_sources::{
    DiscussionsClient, NewsClient, SourceConfig, SourceTtls, SuggestClient, TopicsClient,
    TrendAggregator, TrendCache,
};

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = trendlens_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = trendlens_db::PoolConfig::from_app_config(&config);
    let pool = trendlens_db::connect_pool(&config.database_url, pool_config).await?;
    trendlens_db::run_migrations(&pool).await?;

    let source_config = SourceConfig::from_app_config(&config);
    let aggregator = Arc::new(TrendAggregator::new(
        SuggestClient::new(&source_config)?,
        TopicsClient::new(&source_config)?,
        DiscussionsClient::new(&source_config)?,
        NewsClient::new(&source_config, config.news_api_key.clone())?,
        TrendCache::new(),
        SourceTtls::from_app_config(&config),
    ));

    let auth = AuthState::from_env(matches!(
        config.env,
        trendlens_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            pool,
            aggregator,
            freshness_minutes: config.analysis_freshness_minutes,
        },
        auth,
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
