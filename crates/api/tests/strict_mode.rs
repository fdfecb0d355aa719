//! Integration tests for `FALLBACK_MODE=strict`: reads still fall back to
//! the mirror, writes are refused instead of applied locally.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use labelops_api::config::FallbackMode;
use labelops_db::models::artist::Artist;
use labelops_db::models::budget::Budget;
use serde_json::json;

fn strict_app() -> common::TestApp {
    let mut config = common::test_config();
    config.fallback_mode = FallbackMode::Strict;
    common::build_test_app_with(config, common::seeded_mirror())
}

#[tokio::test]
async fn reads_are_still_served_from_the_mirror() {
    let app = strict_app();
    let response = get(&app.router, "/api/v1/artists").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn create_is_refused() {
    let app = strict_app();
    let response = post_json(&app.router, "/api/v1/artists", json!({ "name": "Dona Iara" })).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_UNAVAILABLE");
    assert_eq!(app.mirror.list::<Artist>().await.len(), 4);
}

#[tokio::test]
async fn update_is_refused_and_leaves_the_row() {
    let app = strict_app();
    let response = put_json(&app.router, "/api/v1/artists/3", json!({ "genre": "Drill" })).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let artist = app.mirror.get::<Artist>(3).await.unwrap();
    assert_eq!(artist.genre.as_deref(), Some("Trap"));
}

#[tokio::test]
async fn delete_is_refused() {
    let app = strict_app();
    let response = delete(&app.router, "/api/v1/artists/1").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(app.mirror.get::<Artist>(1).await.is_some());
}

#[tokio::test]
async fn budget_upsert_is_refused() {
    let app = strict_app();
    let response = put_json(
        &app.router,
        "/api/v1/projects/1/budgets/Capa",
        json!({ "planned_cents": 1000 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(app.mirror.list::<Budget>().await.len(), 6);
}

#[tokio::test]
async fn health_reports_strict_mode() {
    let app = strict_app();
    let json = body_json(get(&app.router, "/health").await).await;

    assert_eq!(json["fallback_mode"], "strict");
}
