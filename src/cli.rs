//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::roblox::PAGE_SIZES;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// QuickBGC - background checks for Roblox profiles
///
/// Resolves a username or user ID, gathers public profile data through
/// a CORS relay, and writes a report or shows it in the terminal.
///
/// Examples:
///   quickbgc --user RealUser --reason "moderation appeal"
///   quickbgc --user 12345678 --reason "trade dispute" --format json
///   quickbgc --user RealUser --reason "quick look" --format dialog
///   quickbgc --user RealUser --reason "bulk review" --sequential --pacing-ms 500
///   quickbgc --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Username or numeric user ID to check
    #[arg(short, long, value_name = "NAME_OR_ID", required_unless_present = "init_config")]
    pub user: Option<String>,

    /// Platform the account belongs to (only "roblox" is supported)
    #[arg(short, long, default_value = "roblox")]
    pub platform: String,

    /// Why the check is being run; printed on the report
    #[arg(short, long, required_unless_present = "init_config")]
    pub reason: Option<String>,

    /// Output file path for the report
    ///
    /// Defaults to <username>_BGC_Report.<ext> in the output directory.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for reports written under their default name
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format (markdown, json, dialog)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// CORS relay endpoint
    #[arg(long, value_name = "URL", env = "QUICKBGC_PROXY_URL")]
    pub proxy_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .quickbgc.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Result limit for the username search (10, 25, 50 or 100)
    #[arg(long, value_name = "COUNT")]
    pub search_limit: Option<u32>,

    /// Minimum milliseconds between outbound calls
    #[arg(long, value_name = "MILLIS")]
    pub pacing_ms: Option<u64>,

    /// Issue enrichment lookups one at a time
    #[arg(long, conflicts_with = "concurrent")]
    pub sequential: bool,

    /// Issue enrichment lookups all at once
    #[arg(long, conflicts_with = "sequential")]
    pub concurrent: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .quickbgc.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown file (default)
    #[default]
    Markdown,
    /// JSON file
    Json,
    /// Boxed summary printed to the terminal, no file written
    Dialog,
}

impl OutputFormat {
    /// File extension, or `None` for terminal-only output.
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Markdown => Some("md"),
            OutputFormat::Json => Some("json"),
            OutputFormat::Dialog => None,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The submitted identifier, empty if absent (validated by the form layer).
    pub fn identifier(&self) -> &str {
        self.user.as_deref().unwrap_or("")
    }

    /// The submitted reason, empty if absent (validated by the form layer).
    pub fn reason_text(&self) -> &str {
        self.reason.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Validate relay URL format
        if let Some(ref url) = self.proxy_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Proxy URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(limit) = self.search_limit {
            if !PAGE_SIZES.contains(&limit) {
                return Err(format!("Search limit must be one of {:?}", PAGE_SIZES));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }
}
