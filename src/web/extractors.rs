//! Query parameter types and validation
//!
//! Query strings are read leniently: a repeated parameter keeps its first
//! value and unknown parameters are ignored, so extraction itself never
//! fails and every error goes through the plain-text mapping in
//! [`crate::web::responses`].

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use crate::errors::{AppError, AppResult};

/// Decoded `(key, value)` pairs, keeping the first value of each key
fn first_values<'a>(
    query: Option<&'a str>,
    keys: &'static [&'static str],
) -> impl Iterator<Item = (&'static str, String)> + 'a {
    let mut seen: Vec<&'static str> = Vec::new();
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()).filter_map(
        move |(key, value)| {
            let key = keys.iter().copied().find(|k| *k == key)?;
            if seen.contains(&key) {
                return None;
            }
            seen.push(key);
            Some((key, value.into_owned()))
        },
    )
}

const LINK_KEYS: &[&str] = &["link", "body"];
const PLAYER_KEYS: &[&str] = &["src", "title", "poster", "autoplay", "muted", "controls"];

/// `?link=<playlist url>`, plus `body` on the JSON route
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkQuery {
    pub link: Option<String>,
    pub body: Option<String>,
}

impl LinkQuery {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        for (key, value) in first_values(query, LINK_KEYS) {
            match key {
                "link" => parsed.link = Some(value),
                _ => parsed.body = Some(value),
            }
        }
        parsed
    }

    /// The candidate link, if one was supplied. An empty `link=` counts as
    /// absent; whitespace does not, and fails validation later.
    pub fn candidate(&self) -> Option<&str> {
        self.link.as_deref().filter(|link| !link.is_empty())
    }

    /// Whether the JSON view should also carry the raw playlist text
    pub fn include_body(&self) -> AppResult<bool> {
        Ok(parse_flag("body", self.body.as_deref())?.unwrap_or(false))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for LinkQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

/// Display parameters accepted by the player page. Everything is optional;
/// missing values fall back to `config.player`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerQuery {
    pub src: Option<String>,
    pub title: Option<String>,
    pub poster: Option<String>,
    pub autoplay: Option<String>,
    pub muted: Option<String>,
    pub controls: Option<String>,
}

impl PlayerQuery {
    pub fn from_query(query: Option<&str>) -> Self {
        let mut parsed = Self::default();
        for (key, value) in first_values(query, PLAYER_KEYS) {
            let slot = match key {
                "src" => &mut parsed.src,
                "title" => &mut parsed.title,
                "poster" => &mut parsed.poster,
                "autoplay" => &mut parsed.autoplay,
                "muted" => &mut parsed.muted,
                _ => &mut parsed.controls,
            };
            *slot = Some(value);
        }
        parsed
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PlayerQuery {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_query(parts.uri.query()))
    }
}

/// Parse a boolean query flag. A present-but-empty flag (`?autoplay`) is true.
pub fn parse_flag(name: &str, value: Option<&str>) -> AppResult<Option<bool>> {
    let Some(raw) = value else {
        return Ok(None);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        other => Err(AppError::validation(format!(
            "invalid value '{other}' for {name}"
        ))),
    }
}
