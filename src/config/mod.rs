use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::models::ControlSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Outbound playlist retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Upper bound for one fetch, connect through last body byte
    #[serde(default = "default_fetch_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Largest body accepted, in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

/// Defaults for the player page; each can be overridden per request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_hls_script_url")]
    pub hls_script_url: String,
    #[serde(default = "default_player_title")]
    pub default_title: String,
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    #[serde(default = "default_muted")]
    pub muted: bool,
    #[serde(default)]
    pub controls: ControlSet,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Fetcher defaults
fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

// Player defaults
fn default_hls_script_url() -> String {
    DEFAULT_HLS_SCRIPT_URL.to_string()
}

fn default_player_title() -> String {
    DEFAULT_PLAYER_TITLE.to_string()
}

fn default_autoplay() -> bool {
    DEFAULT_AUTOPLAY
}

fn default_muted() -> bool {
    DEFAULT_MUTED
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            user_agent: default_user_agent(),
            max_body_size: default_max_body_size(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hls_script_url: default_hls_script_url(),
            default_title: default_player_title(),
            autoplay: default_autoplay(),
            muted: default_muted(),
            controls: ControlSet::default(),
        }
    }
}

impl Config {
    /// Load configuration: built-in defaults, then the TOML file if it exists,
    /// then `M3U_LOADER_*` environment variables (`__` separates sections).
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if std::path::Path::new(config_file).exists() {
            info!("Loading configuration file: {}", config_file);
            figment = figment.merge(Toml::file(config_file));
        } else {
            info!(
                "Configuration file {} not found, using defaults",
                config_file
            );
        }

        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string, without environment overrides
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.fetcher.timeout.is_zero() {
            return Err(AppError::configuration("fetcher.timeout must be greater than zero"));
        }
        if self.fetcher.max_body_size == 0 {
            return Err(AppError::configuration(
                "fetcher.max_body_size must be greater than zero",
            ));
        }
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::configuration("fetcher.user_agent must not be empty"));
        }
        if self.player.hls_script_url.trim().is_empty() {
            return Err(AppError::configuration("player.hls_script_url must not be empty"));
        }
        Ok(())
    }
}
