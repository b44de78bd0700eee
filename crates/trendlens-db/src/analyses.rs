//! Database operations for the `trend_analyses` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use trendlens_core::TrendReport;

use crate::DbError;

/// A row from the `trend_analyses` table. The per-source lists and the idea
/// list are stored as JSONB and passed through untouched on read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TrendAnalysisRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub keywords: Value,
    pub suggestions: Value,
    pub topics: Value,
    pub discussions: Value,
    pub articles: Value,
    pub post_ideas: Value,
    pub processing_time: f64,
    pub cached: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for [`insert_trend_analysis`].
#[derive(Debug)]
pub struct NewTrendAnalysis<'a> {
    pub business_id: Uuid,
    pub keywords: &'a [String],
    pub report: &'a TrendReport,
}

const SELECT_COLUMNS: &str = "id, business_id, keywords, suggestions, topics, discussions, \
                              articles, post_ideas, processing_time, cached, created_at";

/// Insert an analysis snapshot and return the stored row.
///
/// Snapshot rows are immutable: replays set the `cached` flag in the API
/// response, never by updating the row.
///
/// # Errors
///
/// Returns [`DbError::Encode`] if a list fails to serialize, or
/// [`DbError::Sqlx`] if the insert fails.
pub async fn insert_trend_analysis(
    pool: &PgPool,
    new: NewTrendAnalysis<'_>,
) -> Result<TrendAnalysisRow, DbError> {
    let report = new.report;
    let row = sqlx::query_as::<_, TrendAnalysisRow>(&format!(
        "INSERT INTO trend_analyses \
             (business_id, keywords, suggestions, topics, discussions, articles, \
              post_ideas, processing_time, cached) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {SELECT_COLUMNS}"
    ))
    .bind(new.business_id)
    .bind(serde_json::to_value(new.keywords)?)
    .bind(serde_json::to_value(&report.bundle.suggestions)?)
    .bind(serde_json::to_value(&report.bundle.topics)?)
    .bind(serde_json::to_value(&report.bundle.discussions)?)
    .bind(serde_json::to_value(&report.bundle.articles)?)
    .bind(serde_json::to_value(&report.post_ideas)?)
    .bind(report.processing_time)
    .bind(report.cached)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch an analysis by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_trend_analysis(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<TrendAnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, TrendAnalysisRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM trend_analyses WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Return the most recent analysis whose keyword set equals the given one
/// and which is younger than `window_minutes`, or `None`.
///
/// Set equality over JSONB uses two-way containment, so entry order and
/// duplicates in either list do not affect matching.
///
/// # Errors
///
/// Returns [`DbError::Encode`] if the keyword list fails to serialize, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn latest_analysis_for_keywords(
    pool: &PgPool,
    keywords: &[String],
    window_minutes: i32,
) -> Result<Option<TrendAnalysisRow>, DbError> {
    let keywords_json = serde_json::to_value(keywords)?;
    let row = sqlx::query_as::<_, TrendAnalysisRow>(&format!(
        "SELECT {SELECT_COLUMNS} \
         FROM trend_analyses \
         WHERE keywords @> $1 AND keywords <@ $1 \
           AND created_at >= NOW() - make_interval(mins => $2) \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1"
    ))
    .bind(keywords_json)
    .bind(window_minutes)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
