use std::path::Path;

use anyhow::{Context, Result};
use chrono::{FixedOffset, Local};
use client::ClientSettings;
use client::settings::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_MS};
use compute::pagination::DEFAULT_MAX_VISIBLE_PAGES;
use ::config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

/// Looked up in the working directory as `moneynote.toml` (or any format `config` knows).
pub const DEFAULT_CONFIG_FILE: &str = "moneynote";
pub const ENV_PREFIX: &str = "MONEYNOTE";
pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DisplayConfig {
    pub page_size: u64,
    pub max_visible_pages: u64,
    /// Offset used for "today" and calendar-day windows. Host zone when unset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Defaults, then the config file, then `MONEYNOTE_*` environment variables
    /// (`MONEYNOTE_API__BASE_URL`, `MONEYNOTE_DISPLAY__PAGE_SIZE`, ...).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api.base_url", DEFAULT_API_BASE_URL)?
            .set_default("api.timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?
            .set_default("display.page_size", DEFAULT_PAGE_SIZE)?
            .set_default("display.max_visible_pages", DEFAULT_MAX_VISIBLE_PAGES)?;

        builder = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                builder.add_source(File::from(path).required(true))
            }
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            api_base_url: self.api.base_url.clone(),
            request_timeout_ms: self.api.timeout_ms,
        }
    }

    pub fn timezone(&self) -> FixedOffset {
        self.display
            .utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .unwrap_or_else(|| *Local::now().offset())
    }
}
