use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

use crate::errors::FetchError;

/// Schemes a playlist may be fetched from. Anything else is rejected before
/// any network access.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// A validated absolute http(s) URL pointing at a playlist
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaylistSource(Url);

impl PlaylistSource {
    /// Validate a candidate URL.
    ///
    /// The input is trimmed, must parse as an absolute URL, and must use the
    /// `http` or `https` scheme (compared case-insensitively).
    pub fn parse(input: &str) -> Result<Self, FetchError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FetchError::invalid_source(input, "empty URL"));
        }

        let url = Url::parse(trimmed)
            .map_err(|e| FetchError::invalid_source(input, e.to_string()))?;

        // `Url` normalises the scheme to lowercase
        if !ALLOWED_SCHEMES.contains(&url.scheme()) {
            return Err(FetchError::invalid_source(
                input,
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(FetchError::invalid_source(input, "missing host"));
        }

        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for PlaylistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for PlaylistSource {
    type Error = FetchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlaylistSource> for String {
    fn from(source: PlaylistSource) -> Self {
        source.0.into()
    }
}

impl std::str::FromStr for PlaylistSource {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Raw text of a successfully fetched playlist
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistDocument {
    pub source: PlaylistSource,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl PlaylistDocument {
    pub fn new(source: PlaylistSource, body: String) -> Self {
        Self {
            source,
            body,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Attribute keys with special meaning in IPTV-style playlists
pub mod attributes {
    pub const TVG_NAME: &str = "tvg-name";
    pub const TVG_LOGO: &str = "tvg-logo";
    pub const GROUP_TITLE: &str = "group-title";
}

/// One playable item: a metadata line plus the URL line that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub title: String,
    pub attributes: BTreeMap<String, String>,
    pub url: String,
}

impl PlaylistEntry {
    /// Name to show for this entry: `tvg-name`, then the title, then a placeholder
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.attribute(attributes::TVG_NAME)
            && !name.is_empty()
        {
            return name;
        }
        if !self.title.is_empty() {
            return &self.title;
        }
        "(no name)"
    }

    pub fn logo(&self) -> Option<&str> {
        self.attribute(attributes::TVG_LOGO)
    }

    pub fn group(&self) -> Option<&str> {
        self.attribute(attributes::GROUP_TITLE)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

/// A button on the player page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerControl {
    Play,
    Mute,
    Fullscreen,
    Pip,
    Rotate,
    Quality,
}

impl PlayerControl {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Mute => "mute",
            Self::Fullscreen => "fullscreen",
            Self::Pip => "pip",
            Self::Rotate => "rotate",
            Self::Quality => "quality",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Mute => "Mute",
            Self::Fullscreen => "Fullscreen",
            Self::Pip => "PiP",
            Self::Rotate => "Rotate",
            Self::Quality => "Quality",
        }
    }
}

/// Which group of buttons the player page shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlSet {
    #[default]
    Full,
    Basic,
    None,
}

impl ControlSet {
    pub fn controls(&self) -> &'static [PlayerControl] {
        use PlayerControl::*;
        match self {
            Self::Full => &[Play, Mute, Fullscreen, Pip, Rotate, Quality],
            Self::Basic => &[Play, Mute, Fullscreen],
            Self::None => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Basic => "basic",
            Self::None => "none",
        }
    }
}

impl std::str::FromStr for ControlSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "basic" => Ok(Self::Basic),
            "none" => Ok(Self::None),
            other => Err(format!("unknown control set '{other}'")),
        }
    }
}
