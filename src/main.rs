//! Sumi-Crawl main entry point
//!
//! This is the command-line interface for the Sumi-Crawl web crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_crawl::config::{load_config_with_hash, validate, Config};
use sumi_crawl::crawler::crawl;
use sumi_crawl::frontier::SelectionStrategy;
use sumi_crawl::output::print_report;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Crawl: a polite, single-lane web crawler
///
/// Starting from seed URLs, Sumi-Crawl probes each URL with a HEAD request,
/// fetches the ones serving HTML, and follows their links until nothing is
/// left to visit. Every request is preceded by a fixed politeness delay.
#[derive(Parser, Debug)]
#[command(name = "sumi-crawl")]
#[command(version)]
#[command(about = "A polite, single-lane web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Seed URL to start from (repeatable); replaces the configured seeds
    #[arg(long = "seed", value_name = "URL")]
    seeds: Vec<String>,

    /// Frontier selection policy; overrides the config
    #[arg(long, value_enum)]
    policy: Option<SelectionStrategy>,

    /// Politeness interval in milliseconds; overrides the config
    #[arg(long, value_name = "MS")]
    interval: Option<u64>,

    /// Print every visited URL in the final report
    #[arg(long)]
    list_visited: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate(&config).context("Command-line overrides produced an invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(&config, cli.list_visited).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_crawl=info,warn"),
            1 => EnvFilter::new("sumi_crawl=debug,info"),
            2 => EnvFilter::new("sumi_crawl=trace,debug"),
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

/// Applies command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if !cli.seeds.is_empty() {
        config.seeds.urls = cli.seeds.clone();
    }
    if let Some(policy) = cli.policy {
        config.crawler.selection_policy = policy;
    }
    if let Some(interval) = cli.interval {
        config.crawler.politeness_interval = interval;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!(
        "  Politeness interval: {}ms",
        config.crawler.politeness_interval
    );
    println!("  Selection policy: {}", config.crawler.selection_policy);
    if let Some(seed) = config.crawler.selection_seed {
        println!("  Selection seed: {}", seed);
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!("  Connect timeout: {}s", config.crawler.connect_timeout);
    println!(
        "  503 retries: {} ({}ms apart)",
        config.crawler.retry_unavailable, config.crawler.retry_delay
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.identity);

    println!("\nSeeds ({}):", config.seeds.urls.len());
    for seed in &config.seeds.urls {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, list_visited: bool) -> anyhow::Result<()> {
    tracing::info!("Total seed URLs: {}", config.seeds.urls.len());

    let stop = CancellationToken::new();
    let signal_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current URL");
            signal_stop.cancel();
        }
    });

    let report = crawl(config, stop).await.context("Crawl failed")?;
    print_report(&report, list_visited);

    Ok(())
}
