//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SENTIO_*)
//! 2. TOML config file (if SENTIO_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Default User-Agent for page fetches.
///
/// A desktop-Chrome string; marketplaces serve a stripped-down (often
/// review-free) page to obvious bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SENTIO_*)
/// 2. TOML config file (if SENTIO_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for page fetches (rendered and static tiers).
    ///
    /// Set via SENTIO_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Path to the SQLite review store.
    ///
    /// Set via SENTIO_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Maximum number of review fragments collected per request.
    ///
    /// Set via SENTIO_LIMIT environment variable.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Maximum pages visited per scrape tier.
    ///
    /// Set via SENTIO_MAX_PAGES environment variable.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Static-tier HTTP request timeout in milliseconds.
    ///
    /// Set via SENTIO_FETCH_TIMEOUT_MS environment variable.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Hard navigation timeout for the rendered tier in milliseconds.
    ///
    /// Set via SENTIO_NAV_TIMEOUT_MS environment variable.
    #[serde(default = "default_nav_timeout_ms")]
    pub nav_timeout_ms: u64,

    /// Settle delay after scroll/click actions in milliseconds.
    ///
    /// Set via SENTIO_SETTLE_MS environment variable.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Minimum delay between successive static-tier requests in milliseconds.
    ///
    /// Set via SENTIO_MIN_FETCH_DELAY_MS environment variable.
    #[serde(default = "default_min_fetch_delay_ms")]
    pub min_fetch_delay_ms: u64,

    /// Whether the rendered tier (headless browser) is attempted first.
    ///
    /// Set via SENTIO_RENDER_ENABLED environment variable.
    #[serde(default = "default_true")]
    pub render_enabled: bool,

    /// Optional outbound proxy for the rendering session.
    ///
    /// Set via SENTIO_RENDER_PROXY environment variable.
    #[serde(default)]
    pub render_proxy: Option<String>,

    /// Whether to load the pretrained sentiment model at startup.
    ///
    /// Requires the `model` build feature; without it the deterministic
    /// lexicon backend is always used. Set via SENTIO_MODEL_ENABLED.
    #[serde(default)]
    pub model_enabled: bool,

    /// Hugging Face model id for the pretrained sentiment backend.
    ///
    /// Set via SENTIO_MODEL_ID environment variable.
    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Debug artifact path for the last rendered page (None disables).
    ///
    /// Set via SENTIO_DUMP_RENDER_PATH environment variable.
    #[serde(default = "default_dump_render_path")]
    pub dump_render_path: Option<PathBuf>,

    /// Debug artifact path for the last statically fetched page (None disables).
    ///
    /// Set via SENTIO_DUMP_FETCH_PATH environment variable.
    #[serde(default = "default_dump_fetch_path")]
    pub dump_fetch_path: Option<PathBuf>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./sentio-reviews.sqlite")
}

fn default_limit() -> usize {
    50
}

fn default_max_pages() -> usize {
    6
}

fn default_fetch_timeout_ms() -> u64 {
    20_000
}

fn default_nav_timeout_ms() -> u64 {
    30_000
}

fn default_settle_ms() -> u64 {
    700
}

fn default_min_fetch_delay_ms() -> u64 {
    600
}

fn default_true() -> bool {
    true
}

fn default_model_id() -> String {
    "textattack/bert-base-uncased-SST-2".into()
}

fn default_dump_render_path() -> Option<PathBuf> {
    Some(PathBuf::from("/tmp/sentio_page_dump_render.html"))
}

fn default_dump_fetch_path() -> Option<PathBuf> {
    Some(PathBuf::from("/tmp/sentio_page_dump_fetch.html"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            db_path: default_db_path(),
            limit: default_limit(),
            max_pages: default_max_pages(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            nav_timeout_ms: default_nav_timeout_ms(),
            settle_ms: default_settle_ms(),
            min_fetch_delay_ms: default_min_fetch_delay_ms(),
            render_enabled: true,
            render_proxy: None,
            model_enabled: false,
            model_id: default_model_id(),
            dump_render_path: default_dump_render_path(),
            dump_fetch_path: default_dump_fetch_path(),
        }
    }
}

impl AppConfig {
    /// Static-tier request timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Inter-request throttle for the static tier as a Duration.
    pub fn min_fetch_delay(&self) -> Duration {
        Duration::from_millis(self.min_fetch_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SENTIO_`
    /// 2. TOML file from `SENTIO_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SENTIO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SENTIO_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
