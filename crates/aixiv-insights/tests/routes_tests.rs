//! HTTP route tests using axum's Router directly.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use aixiv_insights::config::Config;
use aixiv_insights::relay::RelayContext;
use aixiv_insights::server::routes::create_router;

fn build_router(config: &Config) -> axum::Router {
    create_router(RelayContext::from_config(config).unwrap(), None)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = build_router(&Config::for_testing("http://unused.localhost"));

    let response = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "aixiv-insights");
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_relays_body_and_content_type() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "all:robots"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<feed/>", "application/atom+xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_router(&Config::for_testing(&mock_server.uri()));
    let response = app
        .oneshot(Request::get("/search?query=all%3Arobots").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/atom+xml");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<feed/>");
}

#[tokio::test]
async fn test_legacy_arxiv_route_accepts_upstream_names() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", "cat:cs.LG"))
        .and(query_param("sortBy", "lastUpdatedDate"))
        .and(query_param("sortOrder", "descending"))
        .and(query_param("start", "15"))
        .and(query_param("max_results", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<feed/>", "application/atom+xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_router(&Config::for_testing(&mock_server.uri()));
    let uri = "/api/arxiv/query?search_query=cat%3Acs.LG&sortBy=lastUpdatedDate\
               &sortOrder=descending&start=15&max_results=15";
    let response = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_search_missing_query_is_400() {
    let app = build_router(&Config::for_testing("http://unused.localhost"));

    let response =
        app.oneshot(Request::get("/search?limit=5").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn test_search_upstream_failure_is_500_envelope() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let app = build_router(&Config::for_testing(&mock_server.uri()));
    let response =
        app.oneshot(Request::get("/search?query=all%3Ax").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "upstream_fetch_failure");
    assert!(body["detail"].as_str().unwrap().contains("502"));
    assert_eq!(body["guidance"], "Please try again.");
}

// =============================================================================
// Themes
// =============================================================================

#[tokio::test]
async fn test_themes_empty_papers_is_200() {
    let app = build_router(&Config::for_testing("http://unused.localhost"));

    let response = app.oneshot(post_json("/themes", &json!({"papers": []}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"themes": []}));
}

#[tokio::test]
async fn test_themes_success_via_legacy_route() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "{\"themes\":[{\"name\":\"Agents\",\"count\":2}]}"}]}}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = build_router(&Config::for_testing(&mock_server.uri()));
    let body = json!({
        "papers": [
            {"id": "1", "title": "Agent A", "summary": "Tools."},
            {"id": "2", "title": "Agent B", "summary": "Planning."}
        ],
        "modelName": ""
    });
    let response = app.oneshot(post_json("/api/gemini/themes", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"themes": [{"name": "Agents", "count": 2}]}));
}

#[tokio::test]
async fn test_themes_not_configured_is_500() {
    let mut config = Config::for_testing("http://unused.localhost");
    config.api_key = None;
    let app = build_router(&config);

    let body = json!({"papers": [{"id": "1", "title": "t", "summary": "s"}]});
    let response = app.oneshot(post_json("/themes", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "service_not_configured");
    assert_eq!(body["guidance"], "Check the server configuration.");
}

#[tokio::test]
async fn test_themes_parse_failure_is_500() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Here are your themes!"}]}}]
        })))
        .mount(&mock_server)
        .await;

    let app = build_router(&Config::for_testing(&mock_server.uri()));
    let body = json!({"papers": [{"id": "1", "title": "t", "summary": "s"}]});
    let response = app.oneshot(post_json("/themes", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "response_parse_failure");
}

#[tokio::test]
async fn test_themes_bad_model_name_is_400() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let app = build_router(&Config::for_testing(&mock_server.uri()));
    let body = json!({
        "papers": [{"id": "1", "title": "t", "summary": "s"}],
        "modelName": "../cachedContents#"
    });
    let response = app.oneshot(post_json("/themes", &body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_request");
    assert!(body["detail"].as_str().unwrap().contains("modelName"));
}

#[tokio::test]
async fn test_themes_malformed_body_is_400() {
    let app = build_router(&Config::for_testing("http://unused.localhost"));

    let response =
        app.oneshot(post_json("/themes", &json!({"papers": "not-a-list"}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_request");
}

// =============================================================================
// Static frontend
// =============================================================================

#[tokio::test]
async fn test_static_dir_serves_spa_fallback() {
    let dir = std::env::temp_dir().join(format!("aixiv-insights-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<html>app</html>").unwrap();

    let ctx = RelayContext::from_config(&Config::for_testing("http://unused.localhost")).unwrap();
    let app = create_router(ctx, Some(&dir));

    let response = app
        .clone()
        .oneshot(Request::get("/favorites").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"<html>app</html>");

    // API routes still win over the fallback.
    let response = app.oneshot(Request::get("/health").body(Body::empty()).unwrap()).await.unwrap();
    assert_eq!(body_json(response).await["status"], "healthy");

    let _ = std::fs::remove_dir_all(&dir);
}
