//! Integration tests for the dashboard overview endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};

#[tokio::test]
async fn overview_counts_the_seeded_tables() {
    let app = common::build_test_app();
    let response = get(&app.router, "/api/v1/dashboard/overview").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "fallback");

    let overview = &json["data"];
    assert_eq!(overview["horizon_days"], 30);
    assert_eq!(overview["counts"]["artists"], 4);
    assert_eq!(overview["counts"]["active_artists"], 3);
    assert_eq!(overview["counts"]["projects"], 4);
    assert_eq!(overview["counts"]["tracks"], 6);
    assert_eq!(overview["counts"]["suppliers"], 3);
    assert_eq!(overview["counts"]["producers"], 2);

    assert_eq!(overview["tracks"]["complete"], 1);
    assert_eq!(overview["tracks"]["in_progress"], 4);

    assert_eq!(overview["finance"]["planned_cents"], 2_830_000);
    assert_eq!(overview["finance"]["paid_cents"], 1_640_000);
    assert_eq!(overview["finance"]["pending_cents"], 500_000);
}

#[tokio::test]
async fn overview_lists_every_project_status() {
    let app = common::build_test_app();
    let json = body_json(get(&app.router, "/api/v1/dashboard/overview").await).await;

    let by_status = json["data"]["projects_by_status"].as_array().unwrap();
    assert_eq!(by_status.len(), 7);
    assert_eq!(by_status[0]["status"], "planning");
    assert_eq!(by_status[0]["count"], 1);
    let mastering = by_status.iter().find(|s| s["status"] == "mastering").unwrap();
    assert_eq!(mastering["count"], 0);
}

#[tokio::test]
async fn horizon_is_echoed_and_clamped() {
    let app = common::build_test_app();

    let json = body_json(get(&app.router, "/api/v1/dashboard/overview?horizon_days=7").await).await;
    assert_eq!(json["data"]["horizon_days"], 7);

    let json =
        body_json(get(&app.router, "/api/v1/dashboard/overview?horizon_days=10000").await).await;
    assert_eq!(json["data"]["horizon_days"], 366);

    let json = body_json(get(&app.router, "/api/v1/dashboard/overview?horizon_days=-3").await).await;
    assert_eq!(json["data"]["horizon_days"], 0);
}

#[tokio::test]
async fn non_numeric_horizon_is_rejected() {
    let app = common::build_test_app();
    let response = get(&app.router, "/api/v1/dashboard/overview?horizon_days=soon").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
