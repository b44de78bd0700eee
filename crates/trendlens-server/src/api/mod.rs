mod analyses;
mod keywords;
mod posts;
mod trends;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use trendlens_core::BusinessProfile;
use trendlens_sources::TrendAggregator;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub aggregator: Arc<TrendAggregator>,
    pub freshness_minutes: i32,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Business profile as submitted by the wizard. Validation is explicit so
/// empty fields surface as `validation_error` rather than a serde rejection.
#[derive(Debug, Deserialize)]
pub(super) struct ProfileBody {
    pub business_name: String,
    pub business_type: String,
    pub city: String,
    pub industry: String,
    pub target_audience: String,
    pub services_offered: String,
}

impl ProfileBody {
    pub(super) fn into_profile(self) -> Result<BusinessProfile, String> {
        let fields = [
            ("business_name", &self.business_name),
            ("business_type", &self.business_type),
            ("city", &self.city),
            ("industry", &self.industry),
            ("target_audience", &self.target_audience),
            ("services_offered", &self.services_offered),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(format!("{name} must not be empty"));
            }
        }

        Ok(BusinessProfile {
            business_name: self.business_name,
            business_type: self.business_type,
            city: self.city,
            industry: self.industry,
            target_audience: self.target_audience,
            services_offered: self.services_offered,
        })
    }
}

pub(super) fn map_db_error(request_id: String, error: &trendlens_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/keywords/generate",
            post(keywords::generate_keywords),
        )
        .route("/api/v1/trends/analyze", post(trends::analyze_trends))
        .route("/api/v1/posts/generate", post(posts::generate_posts))
        .route("/api/v1/analyses/{id}", get(analyses::get_analysis))
        .route(
            "/api/v1/analyses/{id}/posts",
            get(analyses::list_analysis_posts),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match trendlens_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use trendlens_sources::{
        DiscussionsClient, NewsClient, SourceConfig, SourceTtls, SuggestClient, TopicsClient,
        TrendCache,
    };

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "analysis not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_unknown_code_maps_to_500() {
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn profile_body_rejects_blank_fields() {
        let body = ProfileBody {
            business_name: "Joe's Coffee".to_string(),
            business_type: "   ".to_string(),
            city: "Bristol".to_string(),
            industry: "Hospitality".to_string(),
            target_audience: "young professionals".to_string(),
            services_offered: "specialty coffee".to_string(),
        };
        let err = body.into_profile().expect_err("blank field should fail");
        assert!(err.contains("business_type"));
    }

    #[test]
    fn profile_body_accepts_complete_profiles() {
        let body = ProfileBody {
            business_name: "Joe's Coffee".to_string(),
            business_type: "Cafe".to_string(),
            city: "Bristol".to_string(),
            industry: "Hospitality".to_string(),
            target_audience: "young professionals".to_string(),
            services_offered: "specialty coffee".to_string(),
        };
        let profile = body.into_profile().expect("profile should validate");
        assert_eq!(profile.business_name, "Joe's Coffee");
    }

    // -----------------------------------------------------------------------
    // Route integration tests (DB + mocked sources)
    // -----------------------------------------------------------------------

    fn test_source_config() -> SourceConfig {
        SourceConfig {
            request_timeout_secs: 5,
            user_agent: "trendlens-tests".to_string(),
            pacing_delay_ms: 0,
            keyword_cap: 3,
        }
    }

    fn test_state(pool: PgPool, source_base_url: &str) -> AppState {
        let config = test_source_config();
        let aggregator = Arc::new(TrendAggregator::new(
            SuggestClient::with_base_url(&config, source_base_url).expect("suggest client"),
            TopicsClient::with_base_url(&config, source_base_url).expect("topics client"),
            DiscussionsClient::with_base_url(&config, source_base_url)
                .expect("discussions client"),
            NewsClient::with_base_url(&config, Some("test-key".to_string()), source_base_url)
                .expect("news client"),
            TrendCache::new(),
            SourceTtls::default(),
        ));
        AppState {
            pool,
            aggregator,
            freshness_minutes: 120,
        }
    }

    fn test_app(state: AppState) -> Router {
        let auth = AuthState::from_env(true).expect("auth");
        build_app(state, auth, default_rate_limit_state())
    }

    /// Mount all four source mocks. `suggest_requests` counts one request
    /// per analyzed keyword; pass `None` to leave request counts unchecked.
    async fn mount_source_mocks(server: &MockServer, suggest_requests: Option<u64>) {
        let suggest = Mock::given(method("GET"))
            .and(path("/complete/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!(["kw", ["kw near me", "kw deals"]])),
            );
        let topics = Mock::given(method("GET"))
            .and(path("/api/trends/united-kingdom"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "trends": [{ "name": "Local Business", "volume": "Medium" }]
            })));
        let discussions = Mock::given(method("GET"))
            .and(path_regex(r"^/r/[^/]+/hot\.json$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "children": [
                    { "data": { "title": "cafe chat", "selftext": "", "score": 3,
                                "num_comments": 1, "subreddit": "unitedkingdom",
                                "permalink": "/r/unitedkingdom/comments/x/cafe/" } }
                ] }
            })));
        let news = Mock::given(method("GET"))
            .and(path("/v2/everything"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "articles": [{ "title": "Headline", "description": "Body",
                               "publishedAt": "2026-01-05T09:00:00Z",
                               "url": "https://example.com/a" }]
            })));

        if let Some(n) = suggest_requests {
            suggest.expect(n).mount(server).await;
            topics.expect(1).mount(server).await;
            discussions.expect(3).mount(server).await;
            news.expect(1).mount(server).await;
        } else {
            suggest.mount(server).await;
            topics.mount(server).await;
            discussions.mount(server).await;
            news.mount(server).await;
        }
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "business_name": "Joe's Coffee",
            "business_type": "Cafe",
            "city": "Bristol",
            "industry": "Hospitality",
            "target_audience": "young professionals",
            "services_offered": "specialty coffee"
        })
    }

    fn post_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(
                serde_json::to_vec(body).expect("serialize body"),
            ))
            .expect("request")
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok(pool: PgPool) {
        let server = MockServer::start().await;
        let app = test_app(test_state(pool, &server.uri()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn generate_keywords_persists_business_and_derives_list(pool: PgPool) {
        let server = MockServer::start().await;
        let app = test_app(test_state(pool.clone(), &server.uri()));

        let response = app
            .oneshot(post_request("/api/v1/keywords/generate", &profile_json()))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        let keywords = json["data"]["keywords"].as_array().expect("keywords array");
        assert!(keywords.iter().any(|k| k == "cafe"));
        assert!(keywords.iter().any(|k| k == "bristol cafe"));

        let business_id: uuid::Uuid =
            serde_json::from_value(json["data"]["business_id"].clone()).expect("business id");
        let stored = trendlens_db::get_business(&pool, business_id)
            .await
            .expect("get business")
            .expect("business persisted");
        assert_eq!(stored.business_name, "Joe's Coffee");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn generate_keywords_rejects_blank_fields(pool: PgPool) {
        let server = MockServer::start().await;
        let app = test_app(test_state(pool, &server.uri()));

        let mut body = profile_json();
        body["city"] = json!("  ");
        let response = app
            .oneshot(post_request("/api/v1/keywords/generate", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyze_trends_full_run_then_cached_replay(pool: PgPool) {
        let server = MockServer::start().await;
        mount_source_mocks(&server, Some(3)).await;
        let app = test_app(test_state(pool, &server.uri()));

        let body = json!({
            "business_data": profile_json(),
            "keywords": ["cafe", "bristol cafe", "hospitality"]
        });

        let response = app
            .clone()
            .oneshot(post_request("/api/v1/trends/analyze", &body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let first = response_json(response).await;

        assert_eq!(first["data"]["cached"], json!(false));
        assert!(first["data"]["suggestions"].as_array().is_some());
        assert!(first["data"]["topics"].as_array().is_some());
        assert!(first["data"]["discussions"].as_array().is_some());
        assert!(first["data"]["articles"].as_array().is_some());
        assert!(
            first["data"]["post_ideas"].as_array().expect("ideas").len() >= 3,
            "template generator should propose at least three ideas"
        );

        // Same keyword set in a different order replays the stored snapshot
        // without touching the sources again; the expect() counts on the
        // mocks verify that when the MockServer drops.
        let replay_body = json!({
            "business_data": profile_json(),
            "keywords": ["hospitality", "cafe", "bristol cafe"]
        });
        let response = app
            .oneshot(post_request("/api/v1/trends/analyze", &replay_body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let second = response_json(response).await;

        assert_eq!(second["data"]["cached"], json!(true));
        assert_eq!(second["data"]["analysis_id"], first["data"]["analysis_id"]);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analyze_trends_rejects_empty_keyword_list(pool: PgPool) {
        let server = MockServer::start().await;
        let app = test_app(test_state(pool, &server.uri()));

        let body = json!({
            "business_data": profile_json(),
            "keywords": []
        });
        let response = app
            .oneshot(post_request("/api/v1/trends/analyze", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn generate_posts_renders_and_persists_selected_pairs(pool: PgPool) {
        let server = MockServer::start().await;
        mount_source_mocks(&server, None).await;
        let app = test_app(test_state(pool.clone(), &server.uri()));

        let analyze_body = json!({
            "business_data": profile_json(),
            "keywords": ["cafe"]
        });
        let response = app
            .clone()
            .oneshot(post_request("/api/v1/trends/analyze", &analyze_body))
            .await
            .expect("response");
        let analysis = response_json(response).await;
        let analysis_id = analysis["data"]["analysis_id"].clone();

        let posts_body = json!({
            "analysis_id": analysis_id.clone(),
            "business_data": profile_json(),
            "selected_ideas": ["idea_1", "idea_2"],
            "selected_platforms": ["twitter", "facebook"]
        });
        let response = app
            .oneshot(post_request("/api/v1/posts/generate", &posts_body))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;

        let content = json["data"]["content"].as_object().expect("content map");
        assert_eq!(content.len(), 2);
        assert!(content["idea_1"]["twitter"].as_str().is_some());
        assert!(content["idea_2"]["facebook"].as_str().is_some());

        let id: uuid::Uuid = serde_json::from_value(analysis_id).expect("analysis id");
        let rows = trendlens_db::list_posts_for_analysis(&pool, id)
            .await
            .expect("list posts");
        assert_eq!(rows.len(), 4, "two ideas times two platforms");
        assert!(rows.iter().all(|r| !r.content.is_empty()));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn generate_posts_returns_404_for_unknown_analysis(pool: PgPool) {
        let server = MockServer::start().await;
        let app = test_app(test_state(pool.clone(), &server.uri()));

        let body = json!({
            "analysis_id": uuid::Uuid::new_v4(),
            "business_data": profile_json(),
            "selected_ideas": ["idea_1"],
            "selected_platforms": ["twitter"]
        });
        let response = app
            .oneshot(post_request("/api/v1/posts/generate", &body))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM generated_posts")
            .fetch_one(&pool)
            .await
            .expect("count posts");
        assert_eq!(count, 0, "no rows should be written for a missing analysis");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_analysis_returns_404_for_unknown_id(pool: PgPool) {
        let server = MockServer::start().await;
        let app = test_app(test_state(pool, &server.uri()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/analyses/{}", uuid::Uuid::new_v4()))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_analysis_and_posts_round_trip(pool: PgPool) {
        let server = MockServer::start().await;
        mount_source_mocks(&server, None).await;
        let app = test_app(test_state(pool, &server.uri()));

        let analyze_body = json!({
            "business_data": profile_json(),
            "keywords": ["cafe"]
        });
        let response = app
            .clone()
            .oneshot(post_request("/api/v1/trends/analyze", &analyze_body))
            .await
            .expect("response");
        let analysis = response_json(response).await;
        let analysis_id = analysis["data"]["analysis_id"].as_str().expect("id").to_string();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/analyses/{analysis_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = response_json(response).await;
        assert_eq!(fetched["data"]["analysis_id"].as_str(), Some(analysis_id.as_str()));
        assert_eq!(fetched["data"]["cached"], json!(false));

        // No posts generated yet: the listing is empty, not an error.
        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/analyses/{analysis_id}/posts"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let posts = response_json(response).await;
        assert_eq!(posts["data"].as_array().map(Vec::len), Some(0));
    }
}
