//! Playlist handlers
//!
//! `GET /?link=` proxies the playlist text; without a link the same route
//! serves the loader page. `GET /api/v1/playlist?link=` returns the indexed
//! entries as JSON, with the raw text too when `body=1` is given.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::{
    ingestor::index_document,
    utils::url::UrlUtils,
    web::{
        AppState,
        extractors::LinkQuery,
        pages,
        responses::{
            PlaylistResponse, app_error_response, fetch_error_response, html_page, playlist_text,
        },
    },
};

/// Raw playlist text when `link` is given, loader page otherwise
pub async fn index(State(state): State<AppState>, query: LinkQuery) -> Response {
    match query.candidate() {
        Some(link) => fetch_raw(&state, link).await,
        None => match pages::render_loader() {
            Ok(html) => html_page(html),
            Err(e) => app_error_response(e),
        },
    }
}

async fn fetch_raw(state: &AppState, link: &str) -> Response {
    match state.fetcher.fetch_url(link).await {
        Ok(document) => {
            info!(
                "Proxied {} bytes from {}",
                document.len(),
                UrlUtils::obfuscate_credentials(document.source.as_str())
            );
            playlist_text(document)
        }
        Err(e) => fetch_error_response(&e),
    }
}

/// Fetch and index a playlist
pub async fn playlist_entries(
    State(state): State<AppState>,
    query: LinkQuery,
) -> Response {
    let link = query.candidate().unwrap_or_default();
    let include_body = match query.include_body() {
        Ok(include_body) => include_body,
        Err(e) => return app_error_response(e),
    };

    let document = match state.fetcher.fetch_url(link).await {
        Ok(document) => document,
        Err(e) => return fetch_error_response(&e),
    };

    let entries = index_document(&document);
    info!(
        "Indexed {} entries from {}",
        entries.len(),
        UrlUtils::obfuscate_credentials(document.source.as_str())
    );

    let response = PlaylistResponse::new(&document, entries);
    if include_body {
        response.with_body(document.body).into_response()
    } else {
        response.into_response()
    }
}
