//! Adjutant CLI
//!
//! Command-line interface for the Adjutant role lookup cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adjutant_api::{ApiConfig, ApiServer};
use adjutant_cache::{CacheSnapshot, RoleCache};
use adjutant_core::badge::{render_badge, BadgeOptions, BadgeSize};
use adjutant_core::types::Classification;
use adjutant_source::{HttpRoleSource, SourceConfig};

/// Adjutant - shared role lookup cache
#[derive(Parser)]
#[command(name = "adjutant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Role table endpoint
    #[arg(long, global = true, env = "ADJUTANT_ROLES_URL")]
    url: Option<String>,

    /// Snapshot TTL in seconds
    #[arg(long, global = true, env = "ADJUTANT_CACHE_TTL_SECONDS")]
    ttl: Option<u64>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ADJUTANT_HTTP_TIMEOUT_SECONDS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up and classify a role
    Lookup {
        /// Role name (case and surrounding whitespace are ignored)
        name: String,
        /// Print the single-letter badge
        #[arg(short, long)]
        compact: bool,
        /// Print the badge in lowercase
        #[arg(short, long)]
        small: bool,
    },

    /// Show per-classification totals
    Stats,

    /// Count how many of the given roles are adjudicated
    Count {
        /// Role names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Print every cached role
    Dump {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Run the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3002")]
        port: u16,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "adjutant=debug,info"
    } else {
        "adjutant=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = api_config(&cli);

    match cli.command {
        Commands::Lookup { name, compact, small } => cmd_lookup(&config, &name, compact, small).await,
        Commands::Stats => cmd_stats(&config).await,
        Commands::Count { names } => cmd_count(&config, &names).await,
        Commands::Dump { json } => cmd_dump(&config, json).await,
        Commands::Serve { port, bind } => cmd_serve(config, port, &bind).await,
    }
}

/// Environment defaults overridden by explicit flags.
fn api_config(cli: &Cli) -> ApiConfig {
    let mut config = ApiConfig::from_env();
    if let Some(url) = &cli.url {
        config.roles_url = url.clone();
    }
    if let Some(ttl) = cli.ttl {
        config.cache_ttl_seconds = ttl;
    }
    if let Some(timeout) = cli.timeout {
        config.http_timeout_seconds = timeout;
    }
    config
}

fn build_cache(config: &ApiConfig) -> Result<RoleCache> {
    let source = HttpRoleSource::with_config(
        SourceConfig::new(&config.roles_url).with_timeout(config.http_timeout_seconds),
    )
    .context("Invalid role source configuration")?;

    Ok(RoleCache::with_config(Arc::new(source), config.cache_config()))
}

/// Loads the table once; a CLI run has no earlier snapshot to fall back to.
async fn load(config: &ApiConfig) -> Result<(RoleCache, Arc<CacheSnapshot>)> {
    let cache = build_cache(config)?;
    match cache.ensure_loaded(false).await {
        Some(snapshot) => Ok((cache, snapshot)),
        None => bail!("Role table unavailable from {}", config.roles_url),
    }
}

fn paint(label: String, classification: Option<Classification>) -> ColoredString {
    match classification {
        Some(Classification::Deliverable) => label.cyan().bold(),
        Some(Classification::Confirmed) => label.green().bold(),
        Some(Classification::Rejected) => label.red().bold(),
        None => label.dimmed(),
    }
}

/// Look up a single role
async fn cmd_lookup(config: &ApiConfig, name: &str, compact: bool, small: bool) -> Result<()> {
    let (cache, _) = load(config).await?;

    let options = BadgeOptions {
        compact,
        size: if small { BadgeSize::Small } else { BadgeSize::Standard },
    };
    let classification = cache.classify_name(name);

    println!("{} {}", paint(render_badge(classification, &options), classification), name.trim());

    if let Some(record) = cache.lookup(name) {
        println!("   {} {}", "Source:".dimmed(), record.source);
        if !record.category.is_empty() {
            println!("   {} {}", "Category:".dimmed(), record.category);
        }
    }

    Ok(())
}

/// Print aggregate statistics
async fn cmd_stats(config: &ApiConfig) -> Result<()> {
    let (cache, snapshot) = load(config).await?;
    let stats = cache.stats();

    println!("{}", "📊 Role statistics".cyan().bold());
    println!("   {} {}", "Fetched:".dimmed(), snapshot.fetched_at().to_rfc3339());
    println!("   {} {}", "Total:".yellow(), stats.total);
    println!("   {} {}", "Deliverable:".cyan(), stats.deliverable);
    println!("   {} {}", "Confirmed:".green(), stats.confirmed);
    println!("   {} {}", "Rejected:".red(), stats.rejected);

    Ok(())
}

/// Count adjudicated roles in a batch
async fn cmd_count(config: &ApiConfig, names: &[String]) -> Result<()> {
    let (cache, _) = load(config).await?;
    let count = cache.count_adjudicated(names);

    println!(
        "{} {}/{} adjudicated",
        "🧮".cyan(),
        count.adjudicated.to_string().bold(),
        count.total
    );
    println!("   {} {}", "Confirmed:".green(), count.confirmed);
    println!("   {} {}", "Rejected:".red(), count.rejected);

    Ok(())
}

/// Print the whole table
async fn cmd_dump(config: &ApiConfig, json: bool) -> Result<()> {
    let (_, snapshot) = load(config).await?;

    let mut records: Vec<_> = snapshot.records().values().collect();
    records.sort_by(|a, b| a.key.cmp(&b.key));

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let options = BadgeOptions::compact();
    for record in records {
        let classification = Some(record.classify());
        println!(
            "{} {:<32} {:<10} {}",
            paint(render_badge(classification, &options), classification),
            record.key,
            record.source.dimmed(),
            record.category
        );
    }

    Ok(())
}

/// Run API server
async fn cmd_serve(config: ApiConfig, port: u16, bind: &str) -> Result<()> {
    println!("{}", "🚀 Starting Adjutant API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} {}", "Role source:".dimmed(), config.roles_url);
    println!("   {} {}s", "Cache TTL:".dimmed(), config.cache_ttl_seconds);
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to configure API server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    server.run(addr).await?;

    Ok(())
}
