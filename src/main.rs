//! Dapo-Harvest main entry point
//!
//! This is the command-line interface for the Dapo-Harvest school-record harvester.

use anyhow::Context;
use clap::Parser;
use dapo_harvest::config::{load_config_with_hash, validate, Config};
use dapo_harvest::crawler::crawl;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Dapo-Harvest: a resumable school-record harvester
///
/// Walks the Dapodik regional registry down to the schools of the target
/// cities and appends one merged CSV row per school. Rerunning the same
/// command picks up where the last run stopped.
#[derive(Parser, Debug)]
#[command(name = "dapo-harvest")]
#[command(version)]
#[command(about = "A resumable school-record harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Target city substring; repeat to target several (replaces configured cities)
    #[arg(long = "city", value_name = "NAME")]
    cities: Vec<String>,

    /// CSV output path (overrides the configured one)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without harvesting
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics for the existing CSV output and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given; using defaults");
            Config::default()
        }
    };

    if !cli.cities.is_empty() {
        config.targets.cities = cli.cities.clone();
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
    validate(&config).context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("dapo_harvest=info,warn"),
            1 => EnvFilter::new("dapo_harvest=debug,info"),
            2 => EnvFilter::new("dapo_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Dapo-Harvest Dry Run ===\n");

    println!("Registry:");
    println!("  API: {}", config.registry.base_url);
    println!("  Profiles: {}", config.registry.profile_base_url);
    println!("  Semester: {}", config.registry.semester_id);
    println!("  Timeout: {}s", config.registry.request_timeout_secs);
    println!(
        "  Accept invalid certificates: {}",
        config.registry.accept_invalid_certs
    );

    println!("\nRetry:");
    println!("  Strategy: {:?}", config.retry.strategy);
    println!("  Backoff: {}ms", config.retry.backoff_ms);
    match config.retry.max_attempts {
        Some(n) => println!("  Max attempts: {}", n),
        None => println!("  Max attempts: unbounded"),
    }

    println!("\nTargets:");
    println!("  Cities: {}", config.targets.cities.join(", "));
    println!(
        "  Education forms: {}",
        config.targets.education_forms.join(", ")
    );
    println!(
        "  Ownership statuses: {}",
        config.targets.ownership_statuses.join(", ")
    );

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: summarizes the existing CSV output
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    use dapo_harvest::output::{load_statistics, print_statistics};

    println!("CSV: {}\n", config.output.csv_path);
    let stats = load_statistics(Path::new(&config.output.csv_path))?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting harvest into {} (resumes from existing rows)",
        config.output.csv_path
    );

    match crawl(config).await {
        Ok(summary) => {
            summary.log_summary();
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
