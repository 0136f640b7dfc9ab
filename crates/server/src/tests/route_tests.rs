// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::{complaint_body, create_test_app, send, send_json};

async fn create(app: &Router, portal_name: &str, complaint_id: &str) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/complaints",
        Some(complaint_body(portal_name, complaint_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body
}

#[tokio::test]
async fn test_health_reports_ok() {
    let app: Router = create_test_app();

    let (status, body) = send_json(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn test_create_then_list() {
    let app: Router = create_test_app();

    let created: Value = create(&app, "CPGRAMS", "G-1").await;
    assert_eq!(created["displayStatus"], "Overdue");
    assert_eq!(created["dueDate"], "2026-02-14");
    assert_eq!(created["lastUpdated"], "2026-03-01T10:00:00Z");

    let (status, listed) = send_json(&app, "GET", "/api/complaints", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed: &Vec<Value> = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn test_create_same_key_updates_in_place() {
    let app: Router = create_test_app();
    let first: Value = create(&app, "CPGRAMS", "G-1").await;
    let second: Value = create(&app, "cpgrams", "G-1").await;

    assert_eq!(first["id"], second["id"]);
    let (_, listed) = send_json(&app, "GET", "/api/complaints", None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_with_unknown_status_is_bad_request() {
    let app: Router = create_test_app();
    let mut body: Value = complaint_body("CPGRAMS", "G-1");
    body["status"] = json!("Lost");

    let (status, error) = send_json(&app, "POST", "/api/complaints", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"].as_str().unwrap().contains("status"));
}

#[tokio::test]
async fn test_patch_unknown_complaint_is_not_found() {
    let app: Router = create_test_app();

    let (status, body) = send_json(
        &app,
        "PATCH",
        "/api/complaints/missing",
        Some(json!({ "notes": "x" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Complaint not found" }));
}

#[tokio::test]
async fn test_patch_to_resolved_sets_resolution_time() {
    let app: Router = create_test_app();
    let created: Value = create(&app, "CPGRAMS", "G-1").await;
    let uri: String = format!("/api/complaints/{}", created["id"].as_str().unwrap());

    let (status, body) =
        send_json(&app, "PATCH", &uri, Some(json!({ "status": "Resolved" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Resolved");
    assert_eq!(body["resolvedAt"], "2026-03-01T10:00:00Z");
    assert_eq!(body["displayStatus"], "Resolved");
}

#[tokio::test]
async fn test_patch_onto_existing_key_is_conflict() {
    let app: Router = create_test_app();
    create(&app, "CPGRAMS", "G-1").await;
    let second: Value = create(&app, "CPGRAMS", "G-2").await;
    let uri: String = format!("/api/complaints/{}", second["id"].as_str().unwrap());

    let (status, _) =
        send_json(&app, "PATCH", &uri, Some(json!({ "complaintId": "G-1" }))).await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let app: Router = create_test_app();
    let created: Value = create(&app, "CPGRAMS", "G-1").await;
    let uri: String = format!("/api/complaints/{}", created["id"].as_str().unwrap());

    let (status, _, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_upsert_reports_counts() {
    let app: Router = create_test_app();
    create(&app, "CPGRAMS", "G-1").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/complaints/bulk-upsert",
        Some(json!({
            "complaints": [
                { "complaintId": "G-1", "portalName": "CPGRAMS", "status": "First Appeal" },
                { "complaintId": "R-1", "portalName": "RTI Online", "category": "RTI" }
            ]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "upserted": 2, "inserted": 1, "updated": 1 }));
}

#[tokio::test]
async fn test_bulk_upsert_rejects_bad_record() {
    let app: Router = create_test_app();

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/complaints/bulk-upsert",
        Some(json!({ "complaints": [ { "portalName": "CPGRAMS" } ] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("complaints[0].complaintId")
    );
}

#[tokio::test]
async fn test_feed_sync_and_sync_runs() {
    let app: Router = create_test_app();
    let feed: Value = json!({
        "syncedAt": "2026-03-01T06:00:00Z",
        "complaints": [
            { "complaintId": "UMC-1", "status": "Resolved by ward", "dateLodged": "2026-02-10" },
            { "status": "Pending" }
        ]
    });

    let (status, first) =
        send_json(&app, "POST", "/api/complaints/sync", Some(feed.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["imported"], 1);
    assert_eq!(first["skipped"], false);

    let (_, second) = send_json(&app, "POST", "/api/complaints/sync", Some(feed)).await;
    assert_eq!(second["skipped"], true);

    let (status, runs) = send_json(&app, "GET", "/api/sync-runs?limit=5", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(runs["syncRuns"].as_array().unwrap().len(), 2);
    assert_eq!(runs["syncRuns"][0]["status"], "skipped");
}

#[tokio::test]
async fn test_export_csv() {
    let app: Router = create_test_app();
    create(&app, "CPGRAMS", "G-1").await;

    let (status, headers, body) = send(&app, "GET", "/api/complaints/export.csv", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    let text: String = String::from_utf8(body.to_vec()).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("Complaint ID,Portal Name,Category"));
    assert!(lines.next().unwrap().starts_with("G-1,CPGRAMS,Grievance"));
}

#[tokio::test]
async fn test_documents_upload_download_and_release() {
    let app: Router = create_test_app();
    let created: Value = create(&app, "CPGRAMS", "G-1").await;
    let id: &str = created["id"].as_str().unwrap();

    let upload: Request<Body> = Request::builder()
        .method("POST")
        .uri(format!("/api/complaints/{id}/documents?name=reply.pdf"))
        .header("content-type", "application/pdf")
        .body(Body::from("%PDF-1.4"))
        .unwrap();
    let response = app.clone().oneshot(upload).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes: Bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let attached: Value = serde_json::from_slice(&bytes).unwrap();
    let document_id: &str = attached["document"]["id"].as_str().unwrap();
    assert_eq!(attached["document"]["type"], "application/pdf");
    assert_eq!(attached["document"]["size"], 8);

    let document_uri: String = format!("/api/documents/{document_id}");
    let (status, headers, body) = send(&app, "GET", &document_uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/pdf");
    assert_eq!(body.as_ref(), b"%PDF-1.4");

    send(&app, "DELETE", &format!("/api/complaints/{id}"), None).await;
    let (status, _, _) = send(&app, "GET", &document_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_and_alerts() {
    let app: Router = create_test_app();
    create(&app, "CPGRAMS", "G-1").await;
    create(&app, "CPGRAMS", "G-2").await;

    let (status, dashboard) = send_json(&app, "GET", "/api/dashboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["overview"]["total"], 2);
    assert_eq!(dashboard["alerts"]["overdueTotal"], 2);

    let (status, alerts) = send_json(&app, "GET", "/api/alerts?limit=1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(alerts["overdue"].as_array().unwrap().len(), 1);
    assert_eq!(alerts["overdueTotal"], 2);
}
