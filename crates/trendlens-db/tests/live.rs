//! Live integration tests using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/trendlens-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use sqlx::PgPool;

use trendlens_core::{BusinessProfile, ContentIdea, TrendBundle, TrendReport, TrendingTopic};
use trendlens_db::{
    get_business, get_trend_analysis, insert_business, insert_trend_analysis,
    latest_analysis_for_keywords, list_posts_for_analysis, upsert_generated_post, NewTrendAnalysis,
};

fn profile() -> BusinessProfile {
    BusinessProfile {
        business_name: "Joe's Coffee".to_string(),
        business_type: "Cafe".to_string(),
        city: "Bristol".to_string(),
        industry: "Hospitality".to_string(),
        target_audience: "young professionals".to_string(),
        services_offered: "specialty coffee".to_string(),
    }
}

fn report() -> TrendReport {
    TrendReport {
        bundle: TrendBundle {
            topics: vec![TrendingTopic {
                name: "Local Business".to_string(),
                volume: "Medium".to_string(),
                source: "X Trends UK".to_string(),
            }],
            ..TrendBundle::default()
        },
        post_ideas: vec![ContentIdea {
            id: "idea_1".to_string(),
            concept: "Highlight the seasonal menu".to_string(),
            trend_source: "Local Business Focus".to_string(),
            relevance_score: 0.8,
            reasoning: None,
        }],
        processing_time: 1.25,
        cached: false,
    }
}

fn keywords(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[sqlx::test(migrations = "../../migrations")]
async fn business_insert_and_get_round_trip(pool: PgPool) {
    let inserted = insert_business(&pool, &profile())
        .await
        .expect("insert business");

    let fetched = get_business(&pool, inserted.id)
        .await
        .expect("get business")
        .expect("business exists");

    assert_eq!(fetched.business_name, "Joe's Coffee");
    assert_eq!(fetched.city, "Bristol");
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_business_returns_none_for_unknown_id(pool: PgPool) {
    let fetched = get_business(&pool, uuid::Uuid::new_v4())
        .await
        .expect("get business");
    assert!(fetched.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn analysis_insert_and_get_round_trip(pool: PgPool) {
    let business = insert_business(&pool, &profile())
        .await
        .expect("insert business");

    let kws = keywords(&["cafe", "bristol cafe"]);
    let inserted = insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert analysis");

    assert!(!inserted.cached);
    assert!((inserted.processing_time - 1.25).abs() < f64::EPSILON);

    let fetched = get_trend_analysis(&pool, inserted.id)
        .await
        .expect("get analysis")
        .expect("analysis exists");

    assert_eq!(fetched.business_id, business.id);
    assert_eq!(fetched.keywords, serde_json::json!(["cafe", "bristol cafe"]));
    assert_eq!(fetched.topics[0]["name"], serde_json::json!("Local Business"));
    assert_eq!(fetched.post_ideas[0]["id"], serde_json::json!("idea_1"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn freshness_lookup_matches_set_equal_keywords_in_any_order(pool: PgPool) {
    let business = insert_business(&pool, &profile())
        .await
        .expect("insert business");

    let kws = keywords(&["cafe", "bristol cafe", "hospitality"]);
    let inserted = insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert analysis");

    let reordered = keywords(&["hospitality", "cafe", "bristol cafe"]);
    let hit = latest_analysis_for_keywords(&pool, &reordered, 120)
        .await
        .expect("freshness lookup")
        .expect("should hit the stored analysis");
    assert_eq!(hit.id, inserted.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn freshness_lookup_rejects_different_keyword_sets(pool: PgPool) {
    let business = insert_business(&pool, &profile())
        .await
        .expect("insert business");

    let kws = keywords(&["cafe", "bristol cafe"]);
    insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert analysis");

    let subset = keywords(&["cafe"]);
    assert!(latest_analysis_for_keywords(&pool, &subset, 120)
        .await
        .expect("freshness lookup")
        .is_none());

    let superset = keywords(&["cafe", "bristol cafe", "bakery"]);
    assert!(latest_analysis_for_keywords(&pool, &superset, 120)
        .await
        .expect("freshness lookup")
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn freshness_lookup_ignores_analyses_outside_the_window(pool: PgPool) {
    let business = insert_business(&pool, &profile())
        .await
        .expect("insert business");

    let kws = keywords(&["cafe"]);
    let inserted = insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert analysis");

    // Age the row past the freshness window.
    sqlx::query("UPDATE trend_analyses SET created_at = NOW() - INTERVAL '3 hours' WHERE id = $1")
        .bind(inserted.id)
        .execute(&pool)
        .await
        .expect("backdate analysis");

    assert!(latest_analysis_for_keywords(&pool, &kws, 120)
        .await
        .expect("freshness lookup")
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_generated_post_keeps_one_row_per_triple(pool: PgPool) {
    let business = insert_business(&pool, &profile())
        .await
        .expect("insert business");
    let kws = keywords(&["cafe"]);
    let analysis = insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert analysis");

    upsert_generated_post(&pool, analysis.id, "idea_1", "twitter", "first draft")
        .await
        .expect("first upsert");
    let replaced = upsert_generated_post(&pool, analysis.id, "idea_1", "twitter", "second draft")
        .await
        .expect("second upsert");

    assert_eq!(replaced.content, "second draft");

    let rows = list_posts_for_analysis(&pool, analysis.id)
        .await
        .expect("list posts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content, "second draft");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_posts_returns_rows_for_the_analysis_only(pool: PgPool) {
    let business = insert_business(&pool, &profile())
        .await
        .expect("insert business");
    let kws = keywords(&["cafe"]);
    let first = insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert first analysis");
    let second = insert_trend_analysis(
        &pool,
        NewTrendAnalysis {
            business_id: business.id,
            keywords: &kws,
            report: &report(),
        },
    )
    .await
    .expect("insert second analysis");

    upsert_generated_post(&pool, first.id, "idea_1", "twitter", "text a")
        .await
        .expect("upsert a");
    upsert_generated_post(&pool, second.id, "idea_1", "twitter", "text b")
        .await
        .expect("upsert b");

    let rows = list_posts_for_analysis(&pool, first.id)
        .await
        .expect("list posts");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].analysis_id, first.id);
    assert_eq!(rows[0].content, "text a");
}
