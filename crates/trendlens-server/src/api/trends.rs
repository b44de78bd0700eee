use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use trendlens_content::TemplateIdeas;
use trendlens_db::{NewTrendAnalysis, TrendAnalysisRow};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ProfileBody, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AnalyzeTrendsBody {
    pub business_data: ProfileBody,
    pub keywords: Vec<String>,
}

/// One analysis snapshot as returned to the wizard. The per-source lists are
/// passed through as stored JSON.
#[derive(Debug, Serialize)]
pub(super) struct TrendAnalysisData {
    pub analysis_id: Uuid,
    pub keywords: Value,
    pub suggestions: Value,
    pub topics: Value,
    pub discussions: Value,
    pub articles: Value,
    pub post_ideas: Value,
    pub processing_time: f64,
    pub cached: bool,
}

impl TrendAnalysisData {
    pub(super) fn from_row(row: TrendAnalysisRow, cached: bool) -> Self {
        Self {
            analysis_id: row.id,
            keywords: row.keywords,
            suggestions: row.suggestions,
            topics: row.topics,
            discussions: row.discussions,
            articles: row.articles,
            post_ideas: row.post_ideas,
            processing_time: row.processing_time,
            cached,
        }
    }
}

/// Run the trend-analysis step for a profile and keyword list.
///
/// A stored analysis with the same keyword set inside the freshness window
/// is replayed with `cached: true` and no source traffic; otherwise the
/// aggregator runs and the snapshot is persisted.
pub(super) async fn analyze_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeTrendsBody>,
) -> Result<Json<ApiResponse<TrendAnalysisData>>, ApiError> {
    let profile = body
        .business_data
        .into_profile()
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    let keywords: Vec<String> = body
        .keywords
        .iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if keywords.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "keywords must contain at least one entry",
        ));
    }

    let fresh =
        trendlens_db::latest_analysis_for_keywords(&state.pool, &keywords, state.freshness_minutes)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    if let Some(row) = fresh {
        tracing::info!(analysis_id = %row.id, "replaying stored trend analysis");
        return Ok(Json(ApiResponse {
            data: TrendAnalysisData::from_row(row, true),
            meta: ResponseMeta::new(req_id.0),
        }));
    }

    let report = state
        .aggregator
        .analyze(&TemplateIdeas, &profile, &keywords)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "trend analysis failed");
            ApiError::new(req_id.0.clone(), "internal_error", "failed to analyze trends")
        })?;

    let business = trendlens_db::insert_business(&state.pool, &profile)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    let row = trendlens_db::insert_trend_analysis(
        &state.pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &keywords,
            report: &report,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: TrendAnalysisData::from_row(row, false),
        meta: ResponseMeta::new(req_id.0),
    }))
}
