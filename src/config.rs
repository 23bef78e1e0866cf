//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.quickbgc.toml` files.

use crate::cli::OutputFormat;
use crate::proxy::RelayConfig;
use crate::resolve::{AggregatorConfig, FanOut};
use crate::roblox::{Endpoints, FAVORITES_PAGE_SIZES, PAGE_SIZES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".quickbgc.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Relay settings.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

/// CORS relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Relay endpoint.
    #[serde(default = "default_proxy_url")]
    pub base_url: String,

    /// Query parameter carrying the upstream URL.
    #[serde(default = "default_url_param")]
    pub url_param: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent sent to the relay.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: default_proxy_url(),
            url_param: default_url_param(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_proxy_url() -> String {
    RelayConfig::default().base_url
}

fn default_url_param() -> String {
    "url".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    RelayConfig::default().user_agent
}

/// Lookup behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Result limit for the username search: 10, 25, 50 or 100.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    /// How enrichment lookups are issued: "concurrent" or "sequential".
    #[serde(default)]
    pub fan_out: FanOut,

    /// Minimum milliseconds between outbound calls (0 disables pacing).
    #[serde(default)]
    pub pacing_ms: u64,

    /// Avatar thumbnail size, e.g. "48x48" or "150x150".
    #[serde(default = "default_avatar_size")]
    pub avatar_size: String,

    /// Badges fetched: 10, 25, 50 or 100. Only the first page is read,
    /// so the badge count in the report is at most this value.
    #[serde(default = "default_badge_limit")]
    pub badge_limit: u32,

    /// Favorite games fetched: 10, 25 or 50. Only the first page is read,
    /// so the favorites count in the report is at most this value.
    #[serde(default = "default_favorites_limit")]
    pub favorites_limit: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            search_limit: default_search_limit(),
            fan_out: FanOut::default(),
            pacing_ms: 0,
            avatar_size: default_avatar_size(),
            badge_limit: default_badge_limit(),
            favorites_limit: default_favorites_limit(),
        }
    }
}

fn default_search_limit() -> u32 {
    10
}

fn default_avatar_size() -> String {
    "48x48".to_string()
}

fn default_badge_limit() -> u32 {
    100
}

fn default_favorites_limit() -> u32 {
    50
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// List each group membership in the report.
    #[serde(default = "default_true")]
    pub include_groups: bool,

    /// List each badge in the report.
    #[serde(default = "default_true")]
    pub include_badges: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            include_groups: true,
            include_badges: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.quickbgc.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref proxy_url) = args.proxy_url {
            self.proxy.base_url = proxy_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.proxy.timeout_seconds = timeout;
        }

        if let Some(limit) = args.search_limit {
            self.lookup.search_limit = limit;
        }
        if let Some(pacing) = args.pacing_ms {
            self.lookup.pacing_ms = pacing;
        }
        if args.sequential {
            self.lookup.fan_out = FanOut::Sequential;
        } else if args.concurrent {
            self.lookup.fan_out = FanOut::Concurrent;
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref dir) = args.output_dir {
            self.general.output_dir = dir.display().to_string();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Validate the merged settings against the CLI arguments.
    pub fn validate(&self, args: &crate::cli::Args) -> Result<(), String> {
        if !PAGE_SIZES.contains(&self.lookup.search_limit) {
            return Err(format!(
                "search_limit must be one of {:?}, got {}",
                PAGE_SIZES, self.lookup.search_limit
            ));
        }
        if !PAGE_SIZES.contains(&self.lookup.badge_limit) {
            return Err(format!(
                "badge_limit must be one of {:?}, got {}",
                PAGE_SIZES, self.lookup.badge_limit
            ));
        }
        if !FAVORITES_PAGE_SIZES.contains(&self.lookup.favorites_limit) {
            return Err(format!(
                "favorites_limit must be one of {:?}, got {}",
                FAVORITES_PAGE_SIZES, self.lookup.favorites_limit
            ));
        }
        if self.proxy.timeout_seconds == 0 {
            return Err("timeout_seconds must be at least 1".to_string());
        }
        if args.output.is_some() && self.report.format == OutputFormat::Dialog {
            return Err("--output cannot be used with the dialog format".to_string());
        }
        Ok(())
    }

    /// Log level from the merged verbosity. `quiet` wins over `verbose`.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Relay client settings.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            base_url: self.proxy.base_url.clone(),
            url_param: self.proxy.url_param.clone(),
            timeout_seconds: self.proxy.timeout_seconds,
            user_agent: self.proxy.user_agent.clone(),
        }
    }

    /// Aggregator settings.
    pub fn aggregator_config(&self) -> AggregatorConfig {
        AggregatorConfig {
            endpoints: Endpoints {
                search_limit: self.lookup.search_limit,
                avatar_size: self.lookup.avatar_size.clone(),
                badge_limit: self.lookup.badge_limit,
                favorites_limit: self.lookup.favorites_limit,
            },
            fan_out: self.lookup.fan_out,
            pacing: Duration::from_millis(self.lookup.pacing_ms),
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.general.output_dir)
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
