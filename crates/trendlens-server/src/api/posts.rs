use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trendlens_core::ContentIdea;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ProfileBody, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct GeneratePostsBody {
    pub analysis_id: Uuid,
    pub business_data: ProfileBody,
    pub selected_ideas: Vec<String>,
    pub selected_platforms: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct PostsData {
    pub content: BTreeMap<String, BTreeMap<String, String>>,
}

/// Render post text for the selected (idea, platform) pairs and persist one
/// row per pair under the analysis.
pub(super) async fn generate_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<GeneratePostsBody>,
) -> Result<Json<ApiResponse<PostsData>>, ApiError> {
    let profile = body
        .business_data
        .into_profile()
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;
    if body.selected_ideas.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "selected_ideas must contain at least one entry",
        ));
    }
    if body.selected_platforms.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "selected_platforms must contain at least one entry",
        ));
    }

    let analysis = trendlens_db::get_trend_analysis(&state.pool, body.analysis_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "analysis not found"))?;

    let ideas: Vec<ContentIdea> =
        serde_json::from_value(analysis.post_ideas.clone()).map_err(|e| {
            tracing::error!(analysis_id = %analysis.id, error = %e, "stored ideas are malformed");
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "stored ideas are malformed",
            )
        })?;

    let content = trendlens_content::generate_posts(
        &profile,
        &ideas,
        &body.selected_ideas,
        &body.selected_platforms,
    );

    for (idea_id, per_platform) in &content {
        for (platform, text) in per_platform {
            trendlens_db::upsert_generated_post(&state.pool, analysis.id, idea_id, platform, text)
                .await
                .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
        }
    }

    tracing::info!(
        analysis_id = %analysis.id,
        ideas = content.len(),
        platforms = body.selected_platforms.len(),
        "generated post content"
    );

    Ok(Json(ApiResponse {
        data: PostsData { content },
        meta: ResponseMeta::new(req_id.0),
    }))
}
