mod common;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use axum_test::TestServer;
use serde_json::Value;
use tower::ServiceExt;

use common::{SAMPLE_PLAYLIST, closed_port_url, spawn_upstream};
use m3u_loader::{
    config::Config,
    web::{AppState, create_app},
};

fn app() -> Router {
    create_app(AppState::new(Config::default()).unwrap())
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

// Helper function to send requests to the app
async fn send_request(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, headers, String::from_utf8(body_bytes.to_vec()).unwrap())
}

fn assert_fetch_headers(headers: &HeaderMap) {
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
}

#[tokio::test]
async fn test_root_without_link_serves_loader_page() {
    let (status, headers, body) = send_request(&app(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert!(body.contains("id=\"m3uLink\""));
}

#[tokio::test]
async fn test_root_with_empty_link_serves_loader_page() {
    let (status, _, body) = send_request(&app(), "/?link=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<html"));
}

#[tokio::test]
async fn test_link_proxies_playlist_text_verbatim() {
    let upstream = spawn_upstream().await;
    let uri = format!("/?link={}", encode(&upstream.url("/playlist.m3u")));

    let (status, headers, body) = send_request(&app(), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain; charset=utf-8");
    assert_fetch_headers(&headers);
    assert_eq!(body, SAMPLE_PLAYLIST);
}

#[tokio::test]
async fn test_invalid_link_is_bad_request() {
    let app = app();

    for link in ["file:///etc/passwd", "ftp://example.com/a.m3u", "not a url", "   "] {
        let uri = format!("/?link={}", encode(link));
        let (status, headers, body) = send_request(&app, &uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "link {link:?}");
        assert_fetch_headers(&headers);
        assert_eq!(body, "Error: Invalid URL.");
    }
}

#[tokio::test]
async fn test_repeated_link_uses_first_value() {
    let app = app();

    let (status, headers, body) =
        send_request(&app, "/?link=ftp%3A%2F%2Fx&link=ftp%3A%2F%2Fy").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_fetch_headers(&headers);
    assert_eq!(body, "Error: Invalid URL.");

    let (status, headers, body) = send_request(
        &app,
        "/api/v1/playlist?link=ftp%3A%2F%2Fx&link=http%3A%2F%2Fexample.com%2Fa.m3u",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_fetch_headers(&headers);
    assert_eq!(body, "Error: Invalid URL.");
}

#[tokio::test]
async fn test_repeated_link_fetches_first_upstream() {
    let upstream = spawn_upstream().await;
    let uri = format!(
        "/?link={}&link={}",
        encode(&upstream.url("/playlist.m3u")),
        encode(&upstream.url("/status/404"))
    );

    let (status, headers, body) = send_request(&app(), &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_fetch_headers(&headers);
    assert_eq!(body, SAMPLE_PLAYLIST);
    assert_eq!(upstream.hits(), 1);
}

#[tokio::test]
async fn test_upstream_failure_is_bad_gateway() {
    let upstream = spawn_upstream().await;
    let uri = format!("/?link={}", encode(&upstream.url("/status/404")));

    let (status, headers, body) = send_request(&app(), &uri).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_fetch_headers(&headers);
    assert_eq!(body, "Error: Failed to load M3U (404)");
}

#[tokio::test]
async fn test_unreachable_origin_is_internal_error() {
    let uri = format!("/?link={}", encode(&closed_port_url().await));

    let (status, headers, body) = send_request(&app(), &uri).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_fetch_headers(&headers);
    assert!(body.starts_with("Error: "));
    assert!(!body.contains("127.0.0.1"));
}

#[tokio::test]
async fn test_playlist_api_returns_entries() {
    let upstream = spawn_upstream().await;
    let server = TestServer::new(app()).unwrap();

    let response = server
        .get("/api/v1/playlist")
        .add_query_param("link", upstream.url("/playlist.m3u"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");

    let json: Value = response.json();
    assert_eq!(json["source"], upstream.url("/playlist.m3u"));
    assert_eq!(json["count"], 2);

    let entries = json["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["title"], "Channel One");
    assert_eq!(entries[0]["url"], "http://stream/1.m3u8");
    assert_eq!(entries[0]["attributes"]["group-title"], "News");
    assert_eq!(entries[0]["attributes"]["tvg-logo"], "http://x/a.png");
    assert_eq!(entries[1]["display_name"], "Deux");
}

#[tokio::test]
async fn test_playlist_api_body_flag() {
    let upstream = spawn_upstream().await;
    let server = TestServer::new(app()).unwrap();

    let response = server
        .get("/api/v1/playlist")
        .add_query_param("link", upstream.url("/playlist.m3u"))
        .await;
    let json: Value = response.json();
    assert!(json.get("body").is_none());

    let response = server
        .get("/api/v1/playlist")
        .add_query_param("body", "1")
        .add_query_param("link", upstream.url("/playlist.m3u"))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["body"], SAMPLE_PLAYLIST);
    assert_eq!(json["count"], 2);
    assert_eq!(upstream.hits(), 2);

    let response = server
        .get("/api/v1/playlist")
        .add_query_param("body", "maybe")
        .add_query_param("link", upstream.url("/playlist.m3u"))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    assert_eq!(upstream.hits(), 2);
}

#[tokio::test]
async fn test_player_repeated_parameters_use_first_value() {
    let (status, _, html) = send_request(
        &app(),
        "/player?title=First&title=Second&controls=none&controls=everything",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<h1>First</h1>"));
    assert!(!html.contains("<button data-control="));
}

#[tokio::test]
async fn test_playlist_api_without_link_is_bad_request() {
    let server = TestServer::new(app()).unwrap();

    let response = server.get("/api/v1/playlist").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Error: Invalid URL.");
}

#[tokio::test]
async fn test_playlist_api_upstream_failure() {
    let upstream = spawn_upstream().await;
    let server = TestServer::new(app()).unwrap();

    let response = server
        .get("/api/v1/playlist")
        .add_query_param("link", upstream.url("/status/503"))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_text("Error: Failed to load M3U (503)");
}

#[tokio::test]
async fn test_player_page_renders_options() {
    let server = TestServer::new(app()).unwrap();

    let response = server
        .get("/player")
        .add_query_param("src", "https://cdn.example.com/live/index.m3u8")
        .add_query_param("title", "News <HD>")
        .add_query_param("autoplay", "1")
        .add_query_param("muted", "true")
        .add_query_param("controls", "basic")
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(header::CACHE_CONTROL), "no-store");

    let html = response.text();
    assert!(html.contains("News &lt;HD&gt;"));
    assert!(html.contains("https://cdn.example.com/live/index.m3u8"));
    assert!(html.contains("data-control=\"play\""));
    assert!(!html.contains("<select data-control=\"quality\""));
}

#[tokio::test]
async fn test_player_page_without_source() {
    let server = TestServer::new(app()).unwrap();

    let response = server.get("/player").await;

    response.assert_status_ok();
    assert!(response.text().contains("<video"));
}

#[tokio::test]
async fn test_player_rejects_unsafe_source() {
    let server = TestServer::new(app()).unwrap();

    let response = server
        .get("/player")
        .add_query_param("src", "javascript:alert(1)")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Error: Invalid URL.");
}

#[tokio::test]
async fn test_player_rejects_unknown_options() {
    let server = TestServer::new(app()).unwrap();

    let response = server
        .get("/player")
        .add_query_param("controls", "everything")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .get("/player")
        .add_query_param("autoplay", "maybe")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app();

    let (status, _, body) = send_request(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));

    let (status, _, body) = send_request(&app, "/live").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("alive"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = app();

    let (_, first, _) = send_request(&app, "/live").await;
    let (_, second, _) = send_request(&app, "/?link=ftp%3A%2F%2Fx").await;

    let first = first["x-request-id"].to_str().unwrap().to_string();
    let second = second["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&first).is_ok());
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _, _) = send_request(&app(), "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
