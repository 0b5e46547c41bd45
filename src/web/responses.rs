//! HTTP response types and utilities
//!
//! The fetch path answers in plain text with permissive CORS and no caching,
//! so every error and success on that path goes through the helpers here.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::error;

use crate::errors::{AppError, FetchError};
use crate::models::{PlaylistDocument, PlaylistEntry};

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const NO_STORE: &str = "no-store";

/// Cross-origin and cache headers shared by every fetch-path response
fn with_fetch_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    response
}

/// Plain-text response with the fetch-path headers
pub fn text_response(status: StatusCode, body: impl Into<String>) -> Response {
    let response = (
        status,
        [(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)],
        body.into(),
    )
        .into_response();
    with_fetch_headers(response)
}

/// Raw playlist text, passed through untouched
pub fn playlist_text(document: PlaylistDocument) -> Response {
    text_response(StatusCode::OK, document.body)
}

/// Map a classified fetch failure to status and short message
pub fn fetch_error_response(error: &FetchError) -> Response {
    text_response(error.status_code(), error.user_message())
}

/// Map any application error; internals are logged, never returned
pub fn app_error_response(error: AppError) -> Response {
    match error {
        AppError::Fetch(e) => fetch_error_response(&e),
        AppError::Validation { message } => {
            text_response(StatusCode::BAD_REQUEST, format!("Error: {message}"))
        }
        other => {
            error!("Request failed: {}", other);
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "Error: Internal error")
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        app_error_response(self)
    }
}

/// HTML page that must be revalidated on every load
pub fn html_page(body: String) -> Response {
    let mut response = Html(body).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    response
}

/// One entry in the structured playlist view
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    pub title: String,
    pub display_name: String,
    pub attributes: BTreeMap<String, String>,
    pub url: String,
}

impl From<PlaylistEntry> for EntryView {
    fn from(entry: PlaylistEntry) -> Self {
        let display_name = entry.display_name().to_string();
        Self {
            title: entry.title,
            display_name,
            attributes: entry.attributes,
            url: entry.url,
        }
    }
}

/// Structured view of a fetched playlist
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResponse {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub count: usize,
    pub entries: Vec<EntryView>,
    /// The playlist text, only when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PlaylistResponse {
    pub fn new(document: &PlaylistDocument, entries: Vec<PlaylistEntry>) -> Self {
        Self {
            source: document.source.to_string(),
            fetched_at: document.fetched_at,
            count: entries.len(),
            entries: entries.into_iter().map(EntryView::from).collect(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }
}

impl IntoResponse for PlaylistResponse {
    fn into_response(self) -> Response {
        with_fetch_headers((StatusCode::OK, Json(self)).into_response())
    }
}

/// Health check body
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::NetworkErrorKind;

    #[test]
    fn test_fetch_error_headers_and_status() {
        let response = fetch_error_response(&FetchError::Upstream { status: 404 });
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(headers[header::CONTENT_TYPE], TEXT_PLAIN_UTF8);
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let response = app_error_response(AppError::internal("secret stack detail"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app_error_response(
            FetchError::network(NetworkErrorKind::Timeout, "elapsed").into(),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = app_error_response(AppError::validation("bad flag"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
