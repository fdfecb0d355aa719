//! Integration tests for document and attachment uploads.
//!
//! Uploads never fall back to the mirror, so with the database down every
//! well-formed upload ends in 503 and leaves nothing in the object store.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{body_json, count_files, delete, get, post_multipart};
use labelops_db::models::attachment::Attachment;

const PDF_BYTES: &[u8] = b"%PDF-1.4 contrato de teste";

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[tokio::test]
async fn document_upload_without_database_stores_nothing() {
    let app = common::build_test_app();
    let response = post_multipart(
        &app.router,
        "/api/v1/documents",
        &[("category", "contract"), ("artist_id", "1")],
        Some(("contrato.pdf", "application/pdf", PDF_BYTES)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_UNAVAILABLE");
    assert_eq!(count_files(app.storage_dir.path()), 0);
}

#[tokio::test]
async fn document_upload_requires_a_file() {
    let app = common::build_test_app();
    let response = post_multipart(
        &app.router,
        "/api/v1/documents",
        &[("category", "contract")],
        None,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing 'file' field");
}

#[tokio::test]
async fn document_upload_rejects_an_empty_file() {
    let app = common::build_test_app();
    let response = post_multipart(
        &app.router,
        "/api/v1/documents",
        &[("category", "contract")],
        Some(("vazio.pdf", "application/pdf", b"")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn document_upload_validates_category_before_storing() {
    let app = common::build_test_app();
    let response = post_multipart(
        &app.router,
        "/api/v1/documents",
        &[("category", "memo")],
        Some(("nota.pdf", "application/pdf", PDF_BYTES)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(count_files(app.storage_dir.path()), 0);
}

#[tokio::test]
async fn document_upload_rejects_oversized_files() {
    let app = common::build_test_app();
    let too_big = vec![b'x'; 1024 * 1024 + 1];
    let response = post_multipart(
        &app.router,
        "/api/v1/documents",
        &[("category", "artwork")],
        Some(("capa.png", "image/png", &too_big)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(count_files(app.storage_dir.path()), 0);
}

#[tokio::test]
async fn document_list_filters_by_artist() {
    let app = common::build_test_app();

    let json = body_json(get(&app.router, "/api/v1/documents?artist_id=1").await).await;
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["category"], "contract");

    let json = body_json(get(&app.router, "/api/v1/documents?artist_id=2").await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn document_delete_needs_the_database() {
    let app = common::build_test_app();
    let response = delete(&app.router, "/api/v1/documents/1").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(get(&app.router, "/api/v1/documents/1").await).await;
    assert_eq!(json["data"]["id"], 1);
}

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn attachment_list_requires_an_owner() {
    let app = common::build_test_app();
    let response = get(&app.router, "/api/v1/attachments").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attachment_list_rejects_unknown_owner_types() {
    let app = common::build_test_app();
    let response = get(&app.router, "/api/v1/attachments?owner_type=artist&owner_id=1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn attachment_list_falls_back_per_owner() {
    let app = common::build_test_app();
    let response = get(&app.router, "/api/v1/attachments?owner_type=payment&owner_id=1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "fallback");
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn attachment_upload_without_database_stores_nothing() {
    let app = common::build_test_app();
    let response = post_multipart(
        &app.router,
        "/api/v1/attachments",
        &[("owner_type", "payment"), ("owner_id", "1")],
        Some(("recibo.pdf", "application/pdf", PDF_BYTES)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(count_files(app.storage_dir.path()), 0);
}

#[tokio::test]
async fn attachment_upload_rejects_non_numeric_owner_id() {
    let app = common::build_test_app();
    let response = post_multipart(
        &app.router,
        "/api/v1/attachments",
        &[("owner_type", "payment"), ("owner_id", "um")],
        Some(("recibo.pdf", "application/pdf", PDF_BYTES)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "'owner_id' must be an integer id");
}

#[tokio::test]
async fn deleting_a_payment_drops_its_attachments() {
    let app = common::build_test_app();
    let key = "attachments/payment/2/recibo.pdf";
    app.mirror
        .store(Attachment {
            id: 1,
            owner_type: "payment".into(),
            owner_id: 2,
            file_name: "recibo.pdf".into(),
            storage_key: key.into(),
            public_url: format!("http://localhost:3000/files/{key}"),
            mime_type: "application/pdf".into(),
            size_bytes: PDF_BYTES.len() as i64,
            created_at: Utc::now(),
        })
        .await;
    let object = app.storage_dir.path().join(key);
    std::fs::create_dir_all(object.parent().unwrap()).unwrap();
    std::fs::write(&object, PDF_BYTES).unwrap();

    let response = delete(&app.router, "/api/v1/payments/2").await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let json = body_json(
        get(&app.router, "/api/v1/attachments?owner_type=payment&owner_id=2").await,
    )
    .await;
    assert!(json["data"].as_array().unwrap().is_empty());
    // The database row still points at the object until it is reachable
    // again, so a local delete leaves the file alone.
    assert_eq!(count_files(app.storage_dir.path()), 1);
}
