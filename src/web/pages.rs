//! HTML pages
//!
//! One loader page and one player page. The player page replaces a family of
//! near-identical per-variant handlers: every display difference is a field
//! of [`PlayerOptions`].

use askama::Template;
use serde::Serialize;

use crate::config::PlayerConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{ControlSet, PlayerControl, PlaylistSource};
use crate::web::extractors::{PlayerQuery, parse_flag};

/// Resolved display options for one player page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerOptions {
    pub src: Option<String>,
    pub title: String,
    pub poster: Option<String>,
    pub autoplay: bool,
    pub muted: bool,
    pub controls: ControlSet,
}

impl PlayerOptions {
    /// Merge request parameters over configured defaults, validating URLs
    /// with the same rules as the fetcher.
    pub fn resolve(query: &PlayerQuery, defaults: &PlayerConfig) -> AppResult<Self> {
        let src = non_empty(query.src.as_deref())
            .map(|s| PlaylistSource::parse(s).map(|source| source.to_string()))
            .transpose()?;

        let poster = non_empty(query.poster.as_deref())
            .map(|p| {
                PlaylistSource::parse(p)
                    .map(|url| url.to_string())
                    .map_err(|_| AppError::validation("invalid poster URL"))
            })
            .transpose()?;

        let title = non_empty(query.title.as_deref())
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| defaults.default_title.clone());

        let controls = match non_empty(query.controls.as_deref()) {
            Some(raw) => raw.parse::<ControlSet>().map_err(AppError::validation)?,
            None => defaults.controls,
        };

        Ok(Self {
            src,
            title,
            poster,
            autoplay: parse_flag("autoplay", query.autoplay.as_deref())?
                .unwrap_or(defaults.autoplay),
            muted: parse_flag("muted", query.muted.as_deref())?.unwrap_or(defaults.muted),
            controls,
        })
    }

    /// Options as a JSON literal that is safe inside a `<script>` element
    pub fn to_script_json(&self) -> AppResult<String> {
        let json = serde_json::to_string(self)
            .map_err(|e| AppError::internal(format!("Failed to encode player options: {e}")))?;
        Ok(escape_script_json(&json))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// `<`, `>` and `&` are replaced with their JSON unicode escapes so the
/// literal cannot terminate the surrounding script element.
pub fn escape_script_json(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    for ch in json.chars() {
        match ch {
            '<' => escaped.push_str("\\u003c"),
            '>' => escaped.push_str("\\u003e"),
            '&' => escaped.push_str("\\u0026"),
            '\u{2028}' => escaped.push_str("\\u2028"),
            '\u{2029}' => escaped.push_str("\\u2029"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[derive(Template)]
#[template(path = "loader.html")]
pub struct LoaderPage<'a> {
    pub app_version: &'a str,
}

#[derive(Template)]
#[template(path = "player.html")]
pub struct PlayerPage<'a> {
    pub options: &'a PlayerOptions,
    pub controls: &'static [PlayerControl],
    pub options_json: String,
    pub hls_script_url: &'a str,
}

pub fn render_loader() -> AppResult<String> {
    Ok(LoaderPage {
        app_version: env!("CARGO_PKG_VERSION"),
    }
    .render()?)
}

pub fn render_player(options: &PlayerOptions, config: &PlayerConfig) -> AppResult<String> {
    Ok(PlayerPage {
        options,
        controls: options.controls.controls(),
        options_json: options.to_script_json()?,
        hls_script_url: &config.hls_script_url,
    }
    .render()?)
}
