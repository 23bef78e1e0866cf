//! QuickBGC - Roblox background-check reports
//!
//! A CLI tool that resolves a Roblox username or user ID through a CORS
//! relay, aggregates the public profile data, and renders it as a report.
//!
//! Exit codes:
//!   0 - Success, or a platform other than Roblox (nothing to do)
//!   1 - Invalid input, user not found, fetch failure, or I/O error

mod cli;
mod config;
mod error;
mod form;
mod models;
mod proxy;
mod report;
mod resolve;
mod roblox;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use error::ResolutionError;
use form::FormSubmission;
use indicatif::{ProgressBar, ProgressStyle};
use models::{Report, ReportMetadata};
use proxy::HttpProxyFetcher;
use report::Rendered;
use resolve::ProfileAggregator;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `verbose` from the file applies
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    if let Err(e) = config.validate(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Initialize logging
    init_logging(&config, &args);

    info!("QuickBGC v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    match config_source {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }

    match run_check(args, config).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Background check failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .quickbgc.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the relay URL, pacing, and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings. `RUST_LOG` wins when set.
fn init_logging(config: &Config, args: &Args) {
    let level = config.log_level(args.quiet);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run one form submission end to end. Returns the exit code.
async fn run_check(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    // Step 1: Validate the form
    let form = match FormSubmission::new(args.identifier(), &args.platform, args.reason_text()) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("❌ {}", e);
            return Ok(1);
        }
    };

    if !form.platform.is_supported() {
        info!("Platform not supported: {}", form.platform);
        println!("ℹ️  Platform '{}' is not supported. Nothing to do.", form.platform);
        return Ok(0);
    }

    let format = config.report.format;
    let interactive = !args.quiet && format != OutputFormat::Dialog;

    // Step 2: Resolve and aggregate the profile
    let fetcher = HttpProxyFetcher::new(config.relay_config())?;
    let aggregator = ProfileAggregator::new(fetcher, config.aggregator_config());

    if interactive {
        println!("🔎 Looking up {} on {}", form.identifier, form.platform);
    }
    let spinner = interactive.then(|| lookup_spinner(&form.identifier));

    let outcome = aggregator.resolve(&form.identifier).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let profile = match outcome {
        Ok(profile) => profile,
        Err(e @ ResolutionError::UserNotFound { .. }) => {
            warn!("{}", e);
            eprintln!("❌ No {} user matches '{}'.", form.platform, form.identifier);
            return Ok(1);
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("❌ Could not fetch the profile. {}", e);
            return Ok(1);
        }
    };

    info!("Resolved {} ({})", profile.username, profile.id);

    // Step 3: Render the report
    let report = Report {
        metadata: ReportMetadata {
            platform: form.platform.to_string(),
            reason: form.reason.clone(),
            requested_identifier: form.identifier.clone(),
            generated_at: Utc::now(),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        profile,
    };

    let rendered = report::render(
        &report,
        format,
        &config.report,
        &config.output_dir(),
        args.output.as_deref(),
    )?;

    if let Rendered::File(path) = rendered {
        if !args.quiet {
            println!("\n📊 {} ({})", report.profile.username, report.profile.id);
            println!("   Connections: {}", report.profile.connections());
            println!(
                "   Groups: {} | Badges: {}",
                report.profile.groups_count(),
                report.profile.badges_count()
            );
        }
        println!("\n✅ Report saved to: {}", path.display());
    }

    Ok(0)
}

/// Spinner shown while lookups are in flight.
fn lookup_spinner(identifier: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Fetching profile data for {}...", identifier));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems are reported on stderr.
/// Returns the path the configuration came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, Some(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, Some(PathBuf::from(CONFIG_FILE)))),
        Ok(None) => Ok((Config::default(), None)),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), None))
        }
    }
}
