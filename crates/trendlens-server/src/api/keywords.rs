use axum::{extract::State, Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ProfileBody, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct KeywordsData {
    pub business_id: Uuid,
    pub keywords: Vec<String>,
}

/// Persist the submitted profile and derive its keyword list.
pub(super) async fn generate_keywords(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ProfileBody>,
) -> Result<Json<ApiResponse<KeywordsData>>, ApiError> {
    let profile = body
        .into_profile()
        .map_err(|msg| ApiError::new(req_id.0.clone(), "validation_error", msg))?;

    let business = trendlens_db::insert_business(&state.pool, &profile)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let keywords = trendlens_content::derive_keywords(&profile);
    tracing::debug!(
        business_id = %business.id,
        count = keywords.len(),
        "derived keywords"
    );

    Ok(Json(ApiResponse {
        data: KeywordsData {
            business_id: business.id,
            keywords,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
