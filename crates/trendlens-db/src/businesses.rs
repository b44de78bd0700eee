//! Database operations for the `businesses` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use trendlens_core::BusinessProfile;

use crate::DbError;

/// A row from the `businesses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: Uuid,
    pub business_name: String,
    pub business_type: String,
    pub city: String,
    pub industry: String,
    pub target_audience: String,
    pub services_offered: String,
    pub created_at: DateTime<Utc>,
}

/// Insert a business profile and return the stored row.
///
/// Profiles are immutable after creation; each wizard run inserts its own.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_business(
    pool: &PgPool,
    profile: &BusinessProfile,
) -> Result<BusinessRow, DbError> {
    let row = sqlx::query_as::<_, BusinessRow>(
        "INSERT INTO businesses \
             (business_name, business_type, city, industry, target_audience, services_offered) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING id, business_name, business_type, city, industry, target_audience, \
                   services_offered, created_at",
    )
    .bind(&profile.business_name)
    .bind(&profile.business_type)
    .bind(&profile.city)
    .bind(&profile.industry)
    .bind(&profile.target_audience)
    .bind(&profile.services_offered)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Fetch a business by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_business(pool: &PgPool, id: Uuid) -> Result<Option<BusinessRow>, DbError> {
    let row = sqlx::query_as::<_, BusinessRow>(
        "SELECT id, business_name, business_type, city, industry, target_audience, \
                services_offered, created_at \
         FROM businesses \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
