mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use helpers::{PDF_BASE64, TestApp, create_body};

#[tokio::test]
async fn test_health_reports_store_backend() {
    let app = TestApp::new();
    let response = app.request(Method::GET, "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["store"], "memory");
}

#[tokio::test]
async fn test_create_returns_shareable_url() {
    let app = TestApp::new();
    let response = app
        .request(
            Method::POST,
            "/api/links",
            Some(create_body(json!({"type": "after_first_view"}))),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let data = &response.body["data"];
    let id = data["id"].as_str().unwrap();
    assert_eq!(
        data["url"],
        format!("https://burn.example.com/view?id={id}")
    );
    assert_eq!(data["state"]["tag"], "active");
    assert_eq!(data["watermark_count"], 1);
    assert!(data.get("document").is_none());
}

#[tokio::test]
async fn test_create_without_watermarks_is_bad_request() {
    let app = TestApp::new();
    let mut body = create_body(json!({"type": "after_first_view"}));
    body["watermarks"] = json!([]);

    let response = app.request(Method::POST, "/api/links", Some(body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "NO_WATERMARKS");

    let listed = app.request(Method::GET, "/api/links", None).await;
    assert_eq!(listed.body["data"], json!([]));
}

#[tokio::test]
async fn test_create_with_bad_base64_is_unsupported_document() {
    let app = TestApp::new();
    let mut body = create_body(json!({"type": "after_first_view"}));
    body["document"] = json!("***");

    let response = app.request(Method::POST, "/api/links", Some(body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "UNSUPPORTED_DOCUMENT");
}

#[tokio::test]
async fn test_create_with_unlisted_duration_is_bad_duration() {
    let app = TestApp::new();
    let body = create_body(json!({"type": "after_duration", "seconds": 42}));

    let response = app.request(Method::POST, "/api/links", Some(body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "BAD_DURATION");
}

#[tokio::test]
async fn test_single_view_link_is_gone_after_first_open() {
    let app = TestApp::new();
    let id = app.create(json!({"type": "after_first_view"})).await;

    let first = app
        .request(Method::GET, &format!("/view?id={id}"), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.headers["cache-control"], "no-store");
    assert_eq!(first.body["data"]["document"]["bytes"], PDF_BASE64);
    assert_eq!(first.body["data"]["file_name"], "offer-letter.pdf");
    assert!(first.body["data"]["remaining_seconds"].is_null());

    let second = app
        .request(Method::GET, &format!("/view?id={id}"), None)
        .await;
    assert_eq!(second.status, StatusCode::GONE);
    assert_eq!(second.body["error"], "LINK_GONE");

    let listed = app.request(Method::GET, "/api/links", None).await;
    assert_eq!(listed.body["data"], json!([]));
}

#[tokio::test]
async fn test_consumed_and_unknown_links_look_the_same() {
    let app = TestApp::new();
    let id = app.create(json!({"type": "after_first_view"})).await;
    app.request(Method::GET, &format!("/view?id={id}"), None)
        .await;

    let consumed = app
        .request(Method::GET, &format!("/view?id={id}"), None)
        .await;
    let unknown = app
        .request(Method::GET, "/view?id=never-issued-token", None)
        .await;
    let malformed = app.request(Method::GET, "/view?id=a%2Fb", None).await;

    assert_eq!(consumed.status, unknown.status);
    assert_eq!(consumed.body, unknown.body);
    assert_eq!(malformed.status, StatusCode::GONE);
}

#[tokio::test]
async fn test_timed_link_ticks_after_open() {
    let app = TestApp::new();
    let id = app
        .create(json!({"type": "after_duration", "seconds": 60}))
        .await;

    let before = app
        .request(Method::POST, &format!("/api/view/{id}/tick"), None)
        .await;
    assert_eq!(before.status, StatusCode::OK);
    assert_eq!(before.body["data"]["status"], "not_started");

    let opened = app
        .request(Method::GET, &format!("/view?id={id}"), None)
        .await;
    assert_eq!(opened.status, StatusCode::OK);
    let remaining = opened.body["data"]["remaining_seconds"].as_u64().unwrap();
    assert!(remaining > 0 && remaining <= 60);

    let tick = app
        .request(Method::POST, &format!("/api/view/{id}/tick"), None)
        .await;
    assert_eq!(tick.status, StatusCode::OK);
    assert_eq!(tick.body["data"]["status"], "remaining");

    let shown = app
        .request(Method::GET, &format!("/api/links/{id}"), None)
        .await;
    assert_eq!(shown.body["data"]["state"]["tag"], "opened");
}

#[tokio::test]
async fn test_capture_attempt_is_counted() {
    let app = TestApp::new();
    let id = app
        .create(json!({"type": "after_duration", "seconds": 600}))
        .await;

    let not_opened = app
        .request(
            Method::POST,
            &format!("/api/view/{id}/capture-attempts"),
            None,
        )
        .await;
    assert_eq!(not_opened.body["data"]["status"], "not_opened");

    app.request(Method::GET, &format!("/view?id={id}"), None)
        .await;
    let counted = app
        .request(
            Method::POST,
            &format!("/api/view/{id}/capture-attempts"),
            None,
        )
        .await;
    assert_eq!(counted.status, StatusCode::OK);
    assert_eq!(counted.body["data"]["status"], "counted");
    assert_eq!(counted.body["data"]["attempts"], 1);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = TestApp::new();
    let id = app.create(json!({"type": "after_first_view"})).await;

    let first = app
        .request(Method::DELETE, &format!("/api/links/{id}"), None)
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["removed"], true);

    let second = app
        .request(Method::DELETE, &format!("/api/links/{id}"), None)
        .await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["data"]["removed"], false);

    let shown = app
        .request(Method::GET, &format!("/api/links/{id}"), None)
        .await;
    assert_eq!(shown.status, StatusCode::GONE);

    let opened = app
        .request(Method::GET, &format!("/view?id={id}"), None)
        .await;
    assert_eq!(opened.status, StatusCode::GONE);
}

#[tokio::test]
async fn test_list_is_oldest_first() {
    let app = TestApp::new();
    let first = app.create(json!({"type": "after_first_view"})).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = app
        .create(json!({"type": "after_duration", "seconds": 300}))
        .await;

    let listed = app.request(Method::GET, "/api/links", None).await;
    let ids: Vec<&str> = listed.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
    assert_eq!(listed.body["data"][1]["policy_summary"], "5 min after opening");
}
