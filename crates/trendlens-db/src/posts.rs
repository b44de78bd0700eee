//! Database operations for the `generated_posts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `generated_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeneratedPostRow {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub idea_id: String,
    pub platform: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insert or replace the post for one (analysis, idea, platform) triple.
///
/// The unique constraint on the triple keeps at most one row per pair of
/// idea and platform within an analysis; re-generating replaces the text.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_generated_post(
    pool: &PgPool,
    analysis_id: Uuid,
    idea_id: &str,
    platform: &str,
    content: &str,
) -> Result<GeneratedPostRow, DbError> {
    let row = sqlx::query_as::<_, GeneratedPostRow>(
        "INSERT INTO generated_posts (analysis_id, idea_id, platform, content) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT ON CONSTRAINT generated_posts_triple_key \
         DO UPDATE SET content = EXCLUDED.content \
         RETURNING id, analysis_id, idea_id, platform, content, created_at",
    )
    .bind(analysis_id)
    .bind(idea_id)
    .bind(platform)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// List every generated post for an analysis, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_for_analysis(
    pool: &PgPool,
    analysis_id: Uuid,
) -> Result<Vec<GeneratedPostRow>, DbError> {
    let rows = sqlx::query_as::<_, GeneratedPostRow>(
        "SELECT id, analysis_id, idea_id, platform, content, created_at \
         FROM generated_posts \
         WHERE analysis_id = $1 \
         ORDER BY created_at ASC, id ASC",
    )
    .bind(analysis_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
