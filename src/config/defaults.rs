/// Configuration default values
///
/// All the default values for configuration options, kept in one place.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

// Fetcher defaults
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
// Some M3U hosts reject requests without a browser-like agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_MAX_BODY_SIZE: usize = 8 * 1024 * 1024; // 8MB
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

// Player defaults
pub const DEFAULT_HLS_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/hls.js@1";
pub const DEFAULT_PLAYER_TITLE: &str = "Player";
pub const DEFAULT_AUTOPLAY: bool = false;
pub const DEFAULT_MUTED: bool = false;

// Environment
pub const ENV_PREFIX: &str = "M3U_LOADER_";
