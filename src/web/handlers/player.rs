use axum::{extract::State, response::Response};

use crate::web::{
    AppState,
    extractors::PlayerQuery,
    pages::{PlayerOptions, render_player},
    responses::{app_error_response, html_page},
};

/// Serve the player page for the requested display options
pub async fn player_page(
    State(state): State<AppState>,
    query: PlayerQuery,
) -> Response {
    let player_config = &state.config.player;

    let rendered = PlayerOptions::resolve(&query, player_config)
        .and_then(|options| render_player(&options, player_config));

    match rendered {
        Ok(html) => html_page(html),
        Err(e) => app_error_response(e),
    }
}
