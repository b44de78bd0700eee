use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::trends::TrendAnalysisData;
use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct GeneratedPostItem {
    pub id: Uuid,
    pub analysis_id: Uuid,
    pub idea_id: String,
    pub platform: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Fetch a stored analysis snapshot by id.
pub(super) async fn get_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TrendAnalysisData>>, ApiError> {
    let row = trendlens_db::get_trend_analysis(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "analysis not found"))?;

    let cached = row.cached;
    Ok(Json(ApiResponse {
        data: TrendAnalysisData::from_row(row, cached),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// List every generated post for an analysis. An analysis with no generated
/// posts yields an empty list, not an error.
pub(super) async fn list_analysis_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<GeneratedPostItem>>>, ApiError> {
    let rows = trendlens_db::list_posts_for_analysis(&state.pool, analysis_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows
        .into_iter()
        .map(|row| GeneratedPostItem {
            id: row.id,
            analysis_id: row.analysis_id,
            idea_id: row.idea_id,
            platform: row.platform,
            content: row.content,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
