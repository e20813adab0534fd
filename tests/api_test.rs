/// JSON endpoints under /api: envelopes, validation and error reporting.

use std::sync::Arc;

use actix_web::{http::StatusCode, test};
use serde_json::Value;

use spdash::db::{Row, SqlParam, SqlValue};

mod common;
use common::{announcement_row, app, at, document_row, statistics_row, text, MockExecutor};

async fn get_json(mock: Arc<MockExecutor>, uri: &str) -> (StatusCode, Value) {
    let app = test::init_service(app(mock)).await;
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

#[actix_web::test]
async fn test_announcements_envelope() {
    let mock = Arc::new(MockExecutor::new().respond(
        "'Announcements'",
        vec![
            announcement_row(2, "Second", at(2026, 3, 2, 9)),
            announcement_row(1, "First", at(2026, 3, 1, 9)),
        ],
    ));

    let (status, body) = get_json(mock.clone(), "/api/announcements/?limit=2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["title"], "Second");
    assert_eq!(body["data"][0]["body"], "Body of the announcement");
    assert_eq!(mock.calls()[0].1, vec![SqlParam::Int(2)]);
}

#[actix_web::test]
async fn test_default_limits() {
    let mock = Arc::new(MockExecutor::new());
    get_json(mock.clone(), "/api/announcements/").await;
    get_json(mock.clone(), "/api/documents/").await;

    let calls = mock.calls();
    assert_eq!(calls[0].1, vec![SqlParam::Int(10)]);
    assert_eq!(calls[1].1[0], SqlParam::Int(20));
}

#[actix_web::test]
async fn test_invalid_limit_is_rejected() {
    let mock = Arc::new(MockExecutor::new());

    let (status, body) = get_json(mock.clone(), "/api/announcements/?limit=ten").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap_or_default().contains("limit"));
    assert_eq!(mock.call_count(), 0);
}

#[actix_web::test]
async fn test_documents_carry_download_url_and_size() {
    let mock = Arc::new(MockExecutor::new().respond(
        "LeafName AS FileName",
        vec![document_row("a1", "report.pdf", "pdf", 2_621_440)],
    ));

    let (_, body) = get_json(mock, "/api/documents/").await;
    let doc = &body["data"][0];

    assert_eq!(doc["download_url"], "http://sharepoint.test/sites/hr/Shared Documents/report.pdf");
    assert_eq!(doc["size_mb"], 2.5);
    assert_eq!(doc["size_formatted"], "2.50 MB");
    assert_eq!(doc["is_checked_out"], false);
}

#[actix_web::test]
async fn test_database_failure_reports_error_envelope() {
    let (status, body) = get_json(Arc::new(MockExecutor::failing()), "/api/tasks/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Error loading tasks");
    assert!(!body.to_string().contains("AllUserData"));
}

#[actix_web::test]
async fn test_health_check_hides_driver_error() {
    let (status, body) = get_json(Arc::new(MockExecutor::failing()), "/api/test/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Error reading database info");
    assert!(!body.to_string().contains("Invalid object name"));
}

#[actix_web::test]
async fn test_search_requires_three_characters() {
    let mock = Arc::new(MockExecutor::new());

    let (status, body) = get_json(mock.clone(), "/api/search/?q=ab").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(mock.call_count(), 0);
}

#[actix_web::test]
async fn test_search_rejects_unknown_type() {
    let (status, _) = get_json(Arc::new(MockExecutor::new()), "/api/search/?q=budget&type=people").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_search_envelope() {
    let mock = Arc::new(MockExecutor::new().respond(
        "'Document' AS Type",
        vec![Row::new()
            .with("Type", text("Document"))
            .with("Id", text("d1"))
            .with("Title", text("budget.xlsx"))],
    ));

    let (status, body) = get_json(mock.clone(), "/api/search/?q=budget&type=documents").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "budget");
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["kind"], "Document");
    assert_eq!(mock.call_count(), 1);
}

#[actix_web::test]
async fn test_calendar_window_and_envelope() {
    let mock = Arc::new(MockExecutor::new());

    let (status, body) = get_json(mock.clone(), "/api/calendar/?days=14").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 0);
    assert!(body["events"].as_array().is_some_and(|e| e.is_empty()));
    assert_eq!(mock.calls()[0].1, vec![SqlParam::Int32(0), SqlParam::Int32(14)]);
}

#[actix_web::test]
async fn test_statistics_response_is_cached() {
    let mock = Arc::new(MockExecutor::new().respond("AS TotalLists", vec![statistics_row()]));
    let app = test::init_service(app(mock.clone())).await;

    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/api/statistics/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_documents"], 340);
        assert_eq!(body["data"]["total_size_gb"], 2.0);
    }

    // Totals and breakdown once; the second request is served from the response cache.
    assert_eq!(mock.call_count(), 2);
}

#[actix_web::test]
async fn test_users_active_flag_selects_statement() {
    let mock = Arc::new(MockExecutor::new());
    get_json(mock.clone(), "/api/users/").await;
    get_json(mock.clone(), "/api/users/?active=false").await;

    let calls = mock.calls();
    assert!(calls[0].0.contains("tp_IsActive = 1"));
    assert!(!calls[1].0.contains("tp_IsActive = 1"));
}

#[actix_web::test]
async fn test_health_check() {
    let mock = Arc::new(MockExecutor::new().respond(
        "DB_NAME()",
        vec![Row::new()
            .with("DatabaseName", text("WSS_Content"))
            .with("TableCount", SqlValue::Int(120))],
    ));

    let (status, body) = get_json(mock, "/api/test/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["info"]["DatabaseName"], "WSS_Content");
    assert_eq!(body["info"]["TableCount"], 120);
}

#[actix_web::test]
async fn test_health_check_unreachable() {
    let (status, body) = get_json(Arc::new(MockExecutor::unreachable()), "/api/test/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn test_diagnostics_reports_each_table() {
    let mock = Arc::new(MockExecutor::new().respond(
        "COUNT(*) AS cnt",
        vec![Row::new().with("cnt", SqlValue::Int(4))],
    ));

    let (status, body) = get_json(mock, "/api/diagnostics/").await;
    let tables = body["tables"].as_array().cloned().unwrap_or_default();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(tables.len(), 5);
    assert!(tables.iter().all(|t| t["accessible"] == true && t["row_count"] == 4));
}
