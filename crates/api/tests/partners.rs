//! Integration tests for suppliers and producers while the database is
//! unreachable.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use labelops_db::models::payment::Payment;
use labelops_db::models::producer::Producer;
use labelops_db::models::project::Project;
use labelops_db::models::supplier::Supplier;
use serde_json::json;

fn sorted_ids(json: &serde_json::Value) -> Vec<i64> {
    let mut ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].as_i64().unwrap())
        .collect();
    ids.sort();
    ids
}

// ---------------------------------------------------------------------------
// Suppliers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn suppliers_list_and_search() {
    let app = common::build_test_app();
    let response = get(&app.router, "/api/v1/suppliers").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "fallback");
    assert_eq!(sorted_ids(&json), vec![1, 2, 3]);

    // Matches the service type, case-insensitively.
    let json = body_json(get(&app.router, "/api/v1/suppliers?q=MASTERIZA").await).await;
    assert_eq!(sorted_ids(&json), vec![2]);

    // Matches the tax id.
    let json = body_json(get(&app.router, "/api/v1/suppliers?q=0001-90").await).await;
    assert_eq!(sorted_ids(&json), vec![1]);

    let json = body_json(get(&app.router, "/api/v1/suppliers?q=%20%20").await).await;
    assert_eq!(sorted_ids(&json).len(), 3);
}

#[tokio::test]
async fn supplier_get_by_id_and_404() {
    let app = common::build_test_app();
    let json = body_json(get(&app.router, "/api/v1/suppliers/3").await).await;
    assert_eq!(json["data"]["name"], "Ateliê Capa Dura");

    let response = get(&app.router, "/api/v1/suppliers/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supplier_create_is_applied_locally() {
    let app = common::build_test_app();
    let response = post_json(
        &app.router,
        "/api/v1/suppliers",
        json!({
            "name": "Gráfica Aurora",
            "service_type": "Impressão",
            "email": "pedidos@aurora.com",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["persisted"], false);
    assert_eq!(json["data"]["id"], -1);
    assert_eq!(app.mirror.list::<Supplier>().await.len(), 4);

    let listed = body_json(get(&app.router, "/api/v1/suppliers?q=aurora").await).await;
    assert_eq!(sorted_ids(&listed), vec![-1]);
}

#[tokio::test]
async fn supplier_create_rejects_bad_input() {
    let app = common::build_test_app();

    let response = post_json(&app.router, "/api/v1/suppliers", json!({ "name": "" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app.router,
        "/api/v1/suppliers",
        json!({ "name": "Gráfica", "email": "sem-arroba" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    assert_eq!(app.mirror.list::<Supplier>().await.len(), 3);
}

#[tokio::test]
async fn supplier_update_sets_and_clears_fields() {
    let app = common::build_test_app();
    let response = put_json(
        &app.router,
        "/api/v1/suppliers/1",
        json!({ "notes": "Pagamento em 30 dias", "contact_name": null }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["notes"], "Pagamento em 30 dias");
    assert!(json["data"]["contact_name"].is_null());
    assert_eq!(json["data"]["email"], "agenda@vilasonora.com.br");

    let response = put_json(&app.router, "/api/v1/suppliers/999", json!({ "name": "X" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supplier_delete_unlinks_payments() {
    let app = common::build_test_app();
    let response = delete(&app.router, "/api/v1/suppliers/1").await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert!(app.mirror.get::<Supplier>(1).await.is_none());
    let payments = app.mirror.list::<Payment>().await;
    assert!(payments.iter().all(|p| p.supplier_id != Some(1)));
    // The payments themselves survive.
    assert_eq!(payments.len(), 7);

    let response = delete(&app.router, "/api/v1/suppliers/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn producers_list_and_search() {
    let app = common::build_test_app();
    let json = body_json(get(&app.router, "/api/v1/producers").await).await;
    assert_eq!(sorted_ids(&json), vec![1, 2]);

    let json = body_json(get(&app.router, "/api/v1/producers?q=beats").await).await;
    assert_eq!(sorted_ids(&json), vec![2]);

    let json = body_json(get(&app.router, "/api/v1/producers?q=mixagem").await).await;
    assert_eq!(sorted_ids(&json), vec![1]);

    let json = body_json(get(&app.router, "/api/v1/producers?q=nobody").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn producer_get_by_id_carries_the_fee() {
    let app = common::build_test_app();
    let json = body_json(get(&app.router, "/api/v1/producers/1").await).await;
    assert_eq!(json["data"]["name"], "Rafael Monteiro");
    assert_eq!(json["data"]["fee_cents"], 350_000);

    let response = get(&app.router, "/api/v1/producers/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn producer_create_validates_fee_and_email() {
    let app = common::build_test_app();

    let response = post_json(
        &app.router,
        "/api/v1/producers",
        json!({ "name": "Nando Reis", "fee_cents": -100 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        &app.router,
        "/api/v1/producers",
        json!({ "name": "Nando Reis", "email": "nando@" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.mirror.list::<Producer>().await.len(), 2);

    let response = post_json(
        &app.router,
        "/api/v1/producers",
        json!({ "name": "Nando Reis", "fee_cents": 120_000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(body_json(response).await["data"]["fee_cents"], 120_000);
}

#[tokio::test]
async fn producer_update_can_clear_the_fee() {
    let app = common::build_test_app();
    let response = put_json(&app.router, "/api/v1/producers/1", json!({ "fee_cents": null })).await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let json = body_json(response).await;
    assert!(json["data"]["fee_cents"].is_null());
    assert_eq!(json["data"]["specialty"], "Produção musical e mixagem");

    let response = put_json(&app.router, "/api/v1/producers/1", json!({ "fee_cents": -1 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn producer_delete_frees_their_projects() {
    let app = common::build_test_app();
    let response = delete(&app.router, "/api/v1/producers/2").await;

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let projects = app.mirror.list::<Project>().await;
    assert_eq!(projects.len(), 4);
    assert!(projects.iter().all(|p| p.producer_id != Some(2)));

    let response = delete(&app.router, "/api/v1/producers/2").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
