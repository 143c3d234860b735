//! HTTP API integration tests

use axum_test::TestServer;
use serde_json::{json, Value};

use sentence_lens::config::Config;
use sentence_lens::routes;
use sentence_lens::state::AppState;

fn server() -> TestServer {
    let app = routes::app(AppState::new(Config::default()));
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = server().get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "sentence-lens-server");
}

#[tokio::test]
async fn test_sanitize_endpoint() {
    let response = server()
        .post("/api/sanitize")
        .json(&json!({ "html": "<p onclick=\"x()\">Hi</p><script>alert(1)</script>" }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["html"], "<p>Hi</p>");
}

#[tokio::test]
async fn test_locate_endpoint() {
    let response = server()
        .post("/api/locate")
        .json(&json!({
            "html": "<p>First sentence. <b>Second sentence.</b></p>",
            "sentences": ["First sentence.", "Missing.", "Second sentence."]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["textLength"], 32);
    assert_eq!(body["unmatched"], json!([2]));
    assert_eq!(
        body["ranges"],
        json!([
            { "sentenceIndex": 1, "start": 0, "end": 15 },
            { "sentenceIndex": 3, "start": 16, "end": 32 }
        ])
    );
}

#[tokio::test]
async fn test_project_endpoint() {
    let response = server()
        .post("/api/project")
        .json(&json!({
            "topics": [{ "name": "A", "sentences": [2] }, { "name": "B", "sentences": [1, 2] }],
            "selection": { "selected": ["A"], "read": ["B"] }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["highlighted"], json!([1]));
    assert_eq!(body["faded"], json!([0]));
}

#[tokio::test]
async fn test_render_endpoint() {
    let server = server();
    let request = json!({
        "document": {
            "documentIndex": 2,
            "rawHtml": "<p>One. <a href=\"javascript:x\" target=\"_blank\">Two.</a></p>",
            "sentences": ["One.", "Two."],
            "topics": [{ "name": "A", "sentences": [1] }]
        },
        "selection": { "hovered": "A" }
    });

    let response = server.post("/api/render").json(&request).await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["mode"], "aligned");
    assert_eq!(body["located"], 2);
    let html = body["html"].as_str().unwrap();
    assert!(html.contains("id=\"sl-2-1\""));
    assert!(html.contains("sl-highlighted"));
    assert!(html.contains("rel=\"noopener noreferrer\""));
    assert!(!html.contains("javascript"));

    // Served from the cache the second time
    let again = server.post("/api/render").json(&request).await;
    assert_eq!(again.json::<Value>(), body);
    let health: Value = server.get("/health").await.json();
    assert_eq!(health["cache"]["entries"], 1);
}

#[tokio::test]
async fn test_render_rejects_mismatched_word_marks() {
    let response = server()
        .post("/api/render")
        .json(&json!({
            "document": {
                "rawHtml": "<p>One.</p>",
                "sentences": ["One."],
                "wordMarks": [0, 1]
            }
        }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_oversized_markup_rejected() {
    let mut config = Config::default();
    config.server.max_html_bytes = 8;
    let server = TestServer::new(routes::app(AppState::new(config))).unwrap();

    let response = server
        .post("/api/sanitize")
        .json(&json!({ "html": "<p>too long</p>" }))
        .await;
    response.assert_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE);
}
